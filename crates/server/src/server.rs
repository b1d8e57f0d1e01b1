use axum::{
    Router,
    routing::{get, put},
};

use std::sync::Arc;

use crate::{expenses, incomes};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/incomes",
            get(incomes::list)
                .post(incomes::create)
                .delete(incomes::bulk_delete),
        )
        .route("/incomes/bulk-status", put(incomes::bulk_status))
        .route(
            "/incomes/{id}",
            get(incomes::get)
                .patch(incomes::update)
                .delete(incomes::delete),
        )
        .route("/incomes/{id}/tithe", get(incomes::tithe))
        .route(
            "/expenses",
            get(expenses::list)
                .post(expenses::create)
                .delete(expenses::bulk_delete),
        )
        .route("/expenses/bulk-status", put(expenses::bulk_status))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .patch(expenses::update)
                .delete(expenses::delete),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
