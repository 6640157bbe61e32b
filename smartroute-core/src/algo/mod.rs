pub mod snapping;

pub use snapping::{
    ConnectedSnap, SEARCH_RADIUS_STEPS, SnapResult, nearest_connected_node, nearest_location,
    nearest_node,
};
