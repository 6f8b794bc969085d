pub mod cost;
pub mod error;
pub mod locator;
pub mod models;
pub mod optimizer;
pub mod planner;
pub mod selector;
pub mod settings;
pub mod spatial;
pub mod trip;

pub use cost::{accumulate_cost, leg_cost};
pub use error::{BoxError, OptimizerError};
pub use locator::{
    CandidateLocator, MemoryStationStore, NoCache, StationCache, StationStore,
    STATION_CACHE_TTL,
};
pub use models::{
    Checkpoint, FuelStop, LatLng, OptimizationResult, RouteGeometry, RouteStep, Station,
};
pub use optimizer::FuelOptimizer;
pub use planner::plan_checkpoints;
pub use selector::{select_station, select_stops};
pub use settings::OptimizerSettings;
pub use spatial::{buffer_degrees, haversine_miles, BoundingBox};
pub use trip::{
    FuelStopsRequest, FuelSummary, NamedLocation, RouteByNameRequest, RouteRequest, RouteSummary,
    TripLocations, TripResponse,
};
