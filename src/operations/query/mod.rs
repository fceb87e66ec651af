mod scan;

pub use scan::{Outcome, Scan, ScanMode, ScanResult};
