//! Where a refresh cycle gets its boards from.

use std::future::Future;

use crate::darwin::{DarwinClient, DarwinError, MockDarwinClient, ServiceDetails};
use crate::domain::{ArrivalInfo, Crs, DepartureRecord};

/// Board data provider.
///
/// This abstraction allows refresh cycles to be tested with mock data.
pub trait BoardSource: Send + Sync {
    /// Every departure from `origin`, in board order.
    fn departures(
        &self,
        origin: &Crs,
    ) -> impl Future<Output = Result<Vec<DepartureRecord>, DarwinError>> + Send;

    /// Departures from `origin` that upstream says call at `filter`.
    fn departures_to(
        &self,
        origin: &Crs,
        filter: &Crs,
    ) -> impl Future<Output = Result<Vec<DepartureRecord>, DarwinError>> + Send;

    /// Arrivals at `destination` of services that called at `filter`.
    fn arrivals_from(
        &self,
        destination: &Crs,
        filter: &Crs,
    ) -> impl Future<Output = Result<Vec<ArrivalInfo>, DarwinError>> + Send;

    fn service_details(
        &self,
        service_id: &str,
    ) -> impl Future<Output = Result<ServiceDetails, DarwinError>> + Send;
}

impl BoardSource for DarwinClient {
    async fn departures(&self, origin: &Crs) -> Result<Vec<DepartureRecord>, DarwinError> {
        self.get_departures(origin).await
    }

    async fn departures_to(
        &self,
        origin: &Crs,
        filter: &Crs,
    ) -> Result<Vec<DepartureRecord>, DarwinError> {
        self.get_departures_to(origin, filter).await
    }

    async fn arrivals_from(
        &self,
        destination: &Crs,
        filter: &Crs,
    ) -> Result<Vec<ArrivalInfo>, DarwinError> {
        self.get_arrivals_from(destination, filter).await
    }

    async fn service_details(&self, service_id: &str) -> Result<ServiceDetails, DarwinError> {
        self.get_service_details(service_id).await
    }
}

impl BoardSource for MockDarwinClient {
    async fn departures(&self, origin: &Crs) -> Result<Vec<DepartureRecord>, DarwinError> {
        self.get_departures(origin).await
    }

    async fn departures_to(
        &self,
        origin: &Crs,
        filter: &Crs,
    ) -> Result<Vec<DepartureRecord>, DarwinError> {
        self.get_departures_to(origin, filter).await
    }

    async fn arrivals_from(
        &self,
        destination: &Crs,
        filter: &Crs,
    ) -> Result<Vec<ArrivalInfo>, DarwinError> {
        self.get_arrivals_from(destination, filter).await
    }

    async fn service_details(&self, service_id: &str) -> Result<ServiceDetails, DarwinError> {
        self.get_service_details(service_id).await
    }
}

/// The live API or bundled sample data, chosen at startup.
#[derive(Debug, Clone)]
pub enum Upstream {
    Live(DarwinClient),
    Mock(MockDarwinClient),
}

impl BoardSource for Upstream {
    async fn departures(&self, origin: &Crs) -> Result<Vec<DepartureRecord>, DarwinError> {
        match self {
            Upstream::Live(client) => client.get_departures(origin).await,
            Upstream::Mock(client) => client.get_departures(origin).await,
        }
    }

    async fn departures_to(
        &self,
        origin: &Crs,
        filter: &Crs,
    ) -> Result<Vec<DepartureRecord>, DarwinError> {
        match self {
            Upstream::Live(client) => client.get_departures_to(origin, filter).await,
            Upstream::Mock(client) => client.get_departures_to(origin, filter).await,
        }
    }

    async fn arrivals_from(
        &self,
        destination: &Crs,
        filter: &Crs,
    ) -> Result<Vec<ArrivalInfo>, DarwinError> {
        match self {
            Upstream::Live(client) => client.get_arrivals_from(destination, filter).await,
            Upstream::Mock(client) => client.get_arrivals_from(destination, filter).await,
        }
    }

    async fn service_details(&self, service_id: &str) -> Result<ServiceDetails, DarwinError> {
        match self {
            Upstream::Live(client) => client.get_service_details(service_id).await,
            Upstream::Mock(client) => client.get_service_details(service_id).await,
        }
    }
}
