pub mod dijkstra;
pub mod itinerary;
pub mod sequencer;
pub mod weights;

pub use dijkstra::{ShortestPath, shortest_distances, shortest_path};
pub use itinerary::{RouteOptions, RoutePlan, TravelMode, plan_route};
pub use sequencer::{
    DistanceMatrix, MAX_RECOMMENDED_STOPS, SequenceStatus, StopSequence, sequence_stops,
};
pub use weights::{BaseWeight, EdgeWeight, TrafficLevel};
