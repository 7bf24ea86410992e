//! Walk a HAL API from its root
//!
//! Fetches the root document, prints every link it advertises, then follows one
//! rel with the given template parameters.
//!
//! Run with: cargo run --example walk_api -- http://localhost:3000/api/ orders page=2

use anyhow::Context;
use hal_http::{ClientConfig, HalClient, RequestParameters, RootResource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let root = args
        .next()
        .unwrap_or_else(|| "http://localhost:3000/".to_string());
    let rel = args.next();

    let mut request = RequestParameters::new();
    for pair in args {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("expected name=value, got '{}'", pair))?;
        request = request.with_parameter(name, value);
    }

    println!("HAL API Walk");
    println!("============\n");

    let client = HalClient::with_config(ClientConfig {
        root_endpoint: root,
        enable_logging: true,
        ..Default::default()
    })?;

    let root = client.get_root().await?;
    println!("Root: {}", client.root_endpoint());
    for (name, value) in &root.properties {
        println!("  {} = {}", name, value);
    }

    println!("\nLinks:");
    for link in &root.links {
        let title = link.title.as_deref().unwrap_or("");
        let marker = if link.templated { " (templated)" } else { "" };
        println!("  {:<20} {}{} {}", link.rel, link.href, marker, title);
    }

    let Some(rel) = rel else {
        return Ok(());
    };

    let link = root.links.require(&rel)?;
    println!("\nFollowing '{}' -> {}", rel, client.resolve(link, &request)?);

    let target: RootResource = client.get(link, &request).await?;
    println!("{}", hal_http::codec::encode_pretty(&target)?);

    Ok(())
}
