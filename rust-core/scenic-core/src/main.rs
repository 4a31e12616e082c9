//! Demo server: a small route table served over HTTP.

use anyhow::Context;
use scenic_core::{
    handler, init_tracing, logging, Flow, GroupOptions, RouteAction, Router, ServeOptions, Server,
};
use std::net::SocketAddr;

fn build_router() -> scenic_core::Result<Router> {
    let mut router = Router::new();
    router.pattern("id", r"\d+")?;
    router.alias_middleware("log", logging());

    router.routes(|r| {
        r.get(
            "/",
            handler(|_req, res| {
                res.end("scenic");
                Ok(Flow::Done)
            }),
        )?;

        r.group(GroupOptions::new().prefix("/users").middleware("log").name("users."), |r| {
            r.get(
                "/{id}",
                RouteAction::uses(handler(|req, res| {
                    let id = req.param("id").unwrap_or_default();
                    let body = serde_json::json!({
                        "id": id,
                        "self": req.url("users.show", [("id", id)]),
                    });
                    res.send_json(&body)
                        .map_err(|e| scenic_core::HandlerError::internal(e.to_string()))?;
                    Ok(Flow::Done)
                }))
                .name("show"),
            )
        })?;

        r.serve("/static", "public", ServeOptions::default())
    })?;

    Ok(router)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let addr: SocketAddr = std::env::var("SCENIC_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
        .parse()
        .context("SCENIC_ADDR is not a socket address")?;

    let router = build_router().context("route table is invalid")?;
    for (verb, path) in router.route_list() {
        tracing::info!(%verb, %path, "Route");
    }

    Server::new(router).bind(addr).serve().await?;
    Ok(())
}
