use std::borrow::Cow;

#[derive(Debug, Clone)]
pub enum UpstreamType {
    /// The MCD MCP server
    McdMcp,
    /// The CORS-avoidance proxy served by this workspace
    LocalProxy,
}

impl UpstreamType {
    const fn str(&self) -> &'static str {
        match self {
            Self::McdMcp => "https://mcp.mcd.cn/mcp-servers/mcd-mcp",
            Self::LocalProxy => "http://127.0.0.1:2663/api/mcp",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Upstream<'u> {
    pub u_type: UpstreamType,
    pub u_custom: Option<Cow<'u, str>>,
}

impl<'u> Upstream<'u> {
    pub const MCD_DEFAULT: Upstream<'static> = Upstream {
        u_type: UpstreamType::McdMcp,
        u_custom: None,
    };
    pub const LOCAL_PROXY_DEFAULT: Upstream<'static> = Upstream {
        u_type: UpstreamType::LocalProxy,
        u_custom: None,
    };

    pub fn with_custom(mut self, u_custom: impl Into<Cow<'u, str>>) -> Self {
        self.u_custom = Some(u_custom.into());
        self
    }

    /// Full endpoint url, custom one first
    #[inline]
    pub fn str(&self) -> &str {
        match self.u_custom.as_ref() {
            Some(c) => c.as_ref(),
            None => self.u_type.str(),
        }
    }
}
