//! Helper functions

use crate::kinematic_traits::Point;

/// Checks if all values are finite
pub fn is_valid(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Values in brackets, as printed by Display, joined by the separator.
pub fn format_values(values: &[f64], separator: &str) -> String {
    let joined = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(separator);
    format!("[{}]", joined)
}

/// Values in brackets with three decimals, for log lines.
pub fn format_fixed(values: &[f64]) -> String {
    let joined = values.iter().map(|v| format!("{:.3}", v)).collect::<Vec<_>>().join(" ");
    format!("[{}]", joined)
}

/// Print joint coordinates, one joint per line.
#[allow(dead_code)]
pub fn dump_joints(joints: &[Point]) {
    if joints.is_empty() {
        println!("No joints");
    }
    for (i, joint) in joints.iter().enumerate() {
        println!("{:>3}: {}", i + 1, format_fixed(joint.as_slice()));
    }
}
