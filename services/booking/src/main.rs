use sea_orm::Database;
use tracing::info;

use parkgolf_proto::slot::booking_callback_service_server::BookingCallbackServiceServer;

use parkgolf_booking::config::BookingConfig;
use parkgolf_booking::grpc_server::BookingGrpcServer;
use parkgolf_booking::infra::grpc::{GrpcSlotBus, GrpcSlotCatalog};
use parkgolf_booking::router::build_router;
use parkgolf_booking::state::AppState;
use parkgolf_booking::worker;

#[tokio::main]
async fn main() {
    parkgolf_core::tracing::init_tracing();

    let config = BookingConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let slot_channel = tonic::transport::Channel::from_shared(config.slot_grpc_url.clone())
        .expect("invalid SLOT_GRPC_URL")
        .connect_lazy();
    let notification_channel =
        tonic::transport::Channel::from_shared(config.notification_grpc_url.clone())
            .expect("invalid NOTIFICATION_GRPC_URL")
            .connect_lazy();

    let state = AppState {
        db,
        slot_bus: GrpcSlotBus::new(slot_channel.clone(), notification_channel),
        slot_catalog: GrpcSlotCatalog::new(slot_channel),
    };

    // Background workers: outbox dispatch + retention, saga timeout sweep.
    // Each loop logs and continues on error; none can take the service down.
    tokio::spawn(worker::outbox::run_dispatcher(
        state.outbox_repo(),
        state.bus(),
    ));
    tokio::spawn(worker::outbox::run_cleanup(state.outbox_repo()));
    tokio::spawn(worker::timeout::run_sweeper(state.booking_repo()));

    // Spawn gRPC callback server
    let grpc_state = state.clone();
    let grpc_addr = format!("0.0.0.0:{}", config.booking_grpc_port);
    tokio::spawn(async move {
        let server = BookingGrpcServer { state: grpc_state };
        info!("booking gRPC server listening on {grpc_addr}");
        tonic::transport::Server::builder()
            .add_service(BookingCallbackServiceServer::new(server))
            .serve(grpc_addr.parse().expect("invalid gRPC address"))
            .await
            .expect("gRPC server error");
    });

    // HTTP server
    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.booking_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("booking service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
