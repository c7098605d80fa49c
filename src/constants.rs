// Population
pub const PARTICLE_COUNT: usize = 180;

// Kinematics (units per frame)
pub const MAX_SPEED: f64 = 0.25;
pub const MAX_RADIUS: f64 = 2.0;

// Neighbor search. CELL_SIZE must stay >= CONNECTION_DISTANCE.
pub const CELL_SIZE: f64 = 150.0;
pub const CONNECTION_DISTANCE: f64 = 120.0;

// Drawing
pub const LINE_OPACITY: f64 = 0.4;
pub const LINE_WIDTH: f64 = 1.5;
pub const ACCENT_RGB: (u8, u8, u8) = (99, 102, 241);
pub const PARTICLE_ALPHA: f64 = 0.6;

// Page
pub const CANVAS_ID: &str = "particles";
pub const DATA_URL: &str = "data.yaml";
