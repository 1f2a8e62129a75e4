//! Generated protobuf/gRPC contracts shared between services.

pub mod slot {
    tonic::include_proto!("parkgolf.slot");
}

pub mod notification {
    tonic::include_proto!("parkgolf.notification");
}
