//! gRPC transport for the tracking engine.
//!
//! Exposes the `logistics.api.v1.LogisticsEngineAPI` service. Ingestion RPCs
//! always answer with an empty acknowledgment; only the report RPC can fail.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::{error, info};

use crate::arrival::WarehouseArrivalNotice;
use crate::engine::TrackingEngine;
use crate::error::TrackingError;
use crate::position::Position;
use crate::report::DeliveryReport;
use crate::unit::{UnitId, WarehouseId};

/// Generated protobuf messages and service traits.
pub mod proto {
    #![allow(missing_docs, clippy::pedantic)]
    tonic::include_proto!("logistics.api.v1");
}

use proto::logistics_engine_api_server::{LogisticsEngineApi, LogisticsEngineApiServer};

const REPORT_FAILURE: &str = "failed to process response with metrics report";

/// gRPC service backed by a [`TrackingEngine`].
pub struct LogisticsService {
    engine: Arc<TrackingEngine>,
    shutdown: CancellationToken,
}

impl LogisticsService {
    /// Creates a service; every request runs under a child of `shutdown`.
    #[must_use]
    pub fn new(engine: Arc<TrackingEngine>, shutdown: CancellationToken) -> Self {
        Self { engine, shutdown }
    }

    /// Wraps the service in its generated tonic server.
    #[must_use]
    pub fn into_server(self) -> LogisticsEngineApiServer<Self> {
        LogisticsEngineApiServer::new(self)
    }
}

/// Serves the tracking service on `addr` until `signal` resolves.
///
/// `shutdown` is cancelled as soon as `signal` fires, before in-flight
/// requests drain, so work still running observes the cancellation.
///
/// # Errors
/// Returns the transport error if binding or serving fails.
pub async fn serve<F>(
    engine: Arc<TrackingEngine>,
    addr: SocketAddr,
    shutdown: CancellationToken,
    signal: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()> + Send,
{
    let svc = LogisticsService::new(engine, shutdown.clone()).into_server();

    Server::builder()
        .add_service(svc)
        .serve_with_shutdown(addr, async move {
            signal.await;
            info!("shutdown requested, cancelling in-flight requests");
            shutdown.cancel();
        })
        .await
}

fn position_from(location: Option<proto::Location>) -> Position {
    location.map_or_else(Position::origin, |l| Position::new(l.latitude, l.longitude))
}

fn notice_from(announcement: Option<proto::WarehouseAnnouncement>) -> WarehouseArrivalNotice {
    let a = announcement.unwrap_or_default();
    WarehouseArrivalNotice::new(UnitId::new(a.cargo_unit_id), WarehouseId::new(a.warehouse_id), a.message)
}

fn saturating_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn report_to_proto(report: DeliveryReport) -> proto::MetricsReportResponse {
    proto::MetricsReportResponse {
        delivery_units_number: saturating_i64(report.delivery_units_total_number),
        warehouses_received_supplies_list: report
            .warehouses_received_supplies
            .into_iter()
            .map(WarehouseId::get)
            .collect(),
        delivery_units_reached_destination: report
            .delivery_units_reached_destination
            .into_iter()
            .map(UnitId::get)
            .collect(),
        delivery_units_each_warehouse_received_total_number: report
            .warehouse_deliveries
            .into_iter()
            .map(|c| proto::DeliveryUnitsWarehouseReceivedTotalNumber {
                warehouse_id: c.warehouse_id.get(),
                delivery_units_number: saturating_i64(c.delivery_units_number),
            })
            .collect(),
    }
}

fn status_from_tracking_error(err: &TrackingError) -> Status {
    match err {
        TrackingError::Cancelled { .. } => Status::cancelled(REPORT_FAILURE),
        TrackingError::Storage(_) => Status::internal(REPORT_FAILURE),
    }
}

#[tonic::async_trait]
impl LogisticsEngineApi for LogisticsService {
    async fn move_unit(
        &self,
        request: Request<proto::MoveUnitRequest>,
    ) -> Result<Response<proto::DefaultResponse>, Status> {
        let req = request.into_inner();
        let cancel = self.shutdown.child_token();

        self.engine
            .record_position(&cancel, UnitId::new(req.cargo_unit_id), position_from(req.location));
        Ok(Response::new(proto::DefaultResponse {}))
    }

    async fn unit_reached_warehouse(
        &self,
        request: Request<proto::UnitReachedWarehouseRequest>,
    ) -> Result<Response<proto::DefaultResponse>, Status> {
        let req = request.into_inner();
        let cancel = self.shutdown.child_token();

        self.engine
            .record_arrival(&cancel, position_from(req.location), notice_from(req.announcement));
        Ok(Response::new(proto::DefaultResponse {}))
    }

    async fn metrics_report(
        &self,
        _request: Request<proto::DefaultRequest>,
    ) -> Result<Response<proto::MetricsReportResponse>, Status> {
        let cancel = self.shutdown.child_token();

        match self.engine.compute_report(&cancel) {
            Ok(report) => Ok(Response::new(report_to_proto(report))),
            Err(err) => {
                error!(error = %err, "{REPORT_FAILURE}");
                Err(status_from_tracking_error(&err))
            }
        }
    }
}
