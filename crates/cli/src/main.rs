//! Terminal front-end of the coupon proxy.
//!
//! Keeps the token in a small storage file and talks to the MCP server
//! through the local proxy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lib_core::business::{
    account::credential_store::{CredentialStore, FileCredentialStore},
    coupon::{
        available::AvailableCoupon, claim_all, fetch_available, fetch_mine, mine::ClaimedCoupon,
    },
};
use lib_rpc::{utils::Upstream, Credential, McpClient};
use lib_rpc_client::client::rest::init_reqwest_client;

#[derive(Debug, Parser)]
#[command(name = "mcd-coupon", version, about = "麦当劳优惠券助手")]
struct Cli {
    /// MCP endpoint, the local proxy by default
    #[arg(long, env = "MCD_PROXY_URL")]
    endpoint: Option<String>,

    /// Token storage file
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 管理 MCP Token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// 可领取的优惠券
    Available,
    /// 一键领取全部优惠券
    Claim,
    /// 已领取的优惠券
    Mine,
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// 验证并保存 Token
    Set { token: String },
    /// 清除 Token
    Clear,
    /// 显示当前 Token (已脱敏)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    init_reqwest_client()?;

    let store = FileCredentialStore::new(
        cli.store
            .clone()
            .unwrap_or_else(FileCredentialStore::default_path),
    );
    let client = match cli.endpoint.clone() {
        Some(endpoint) => McpClient::new(Upstream::LOCAL_PROXY_DEFAULT.with_custom(endpoint)),
        None => McpClient::default(),
    };
    if let Some(credential) = store.get()? {
        client.set_token(credential);
    }

    match cli.command {
        Commands::Token { action } => token(&client, &store, action).await,
        Commands::Available => {
            let coupons = fetch_available(&client).await?;
            print_available(&coupons);
            Ok(())
        }
        Commands::Claim => {
            let outcome = claim_all(&client).await?;
            println!("{}", outcome.message);
            match outcome.refreshed {
                Ok(coupons) => print_available(&coupons),
                Err(e) => eprintln!("刷新列表失败: {e}"),
            }
            Ok(())
        }
        Commands::Mine => {
            let coupons = fetch_mine(&client).await?;
            print_mine(&coupons);
            Ok(())
        }
    }
}

async fn token(client: &McpClient, store: &FileCredentialStore, action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Set { token } => {
            let credential = Credential::new(&token)?;
            client.verify_token(credential.clone()).await?;
            store.set(&credential).context("保存 Token 失败")?;
            println!(
                "Token 已保存: {} ({})",
                credential.masked(),
                store.path().display()
            );
        }
        TokenAction::Clear => {
            client.clear_token();
            store.clear().context("清除 Token 失败")?;
            println!("Token 已清除");
        }
        TokenAction::Show => match client.token() {
            Some(credential) => println!("{}", credential.masked()),
            None => println!("未设置 Token"),
        },
    }
    Ok(())
}

fn print_available(coupons: &[AvailableCoupon]) {
    if coupons.is_empty() {
        println!("暂无可领取的优惠券");
        return;
    }
    for (i, coupon) in coupons.iter().enumerate() {
        println!("{:>2}. {} [{}]", i + 1, coupon.title, coupon.status);
        if !coupon.image.is_empty() {
            println!("    {}", coupon.image);
        }
    }
}

fn print_mine(coupons: &[ClaimedCoupon]) {
    if coupons.is_empty() {
        println!("暂无已领取的优惠券");
        return;
    }
    for (i, coupon) in coupons.iter().enumerate() {
        println!("{:>2}. {}", i + 1, coupon.title);
        if !coupon.price.is_empty() {
            println!("    优惠: {}", coupon.price);
        }
        if !coupon.validity.is_empty() {
            println!("    有效期: {}", coupon.validity);
        }
        if !coupon.tags.is_empty() {
            println!("    标签: {}", coupon.tags.join(" / "));
        }
    }
}
