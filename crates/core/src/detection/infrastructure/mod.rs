pub mod http_landmark_detector;
pub mod recorded_landmark_detector;
pub mod topology_checked_detector;
