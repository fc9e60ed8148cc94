//! Defines the parameter data structure of the mechanism

pub mod rpr_kinematics {
    use crate::kinematic_traits::Triple;
    use crate::precision::Precision;
    use crate::singularity::SingularityCheck;
    use crate::target::TargetSampling;
    use crate::utils::format_values;

    /// Parameters of the 3-RPR mechanism and of the target sampling run on it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Parameters {
        /// Name used in progress log lines.
        pub name: String,

        /// Circumradius of the ground joints (R).
        pub ground_radius: f64,

        /// Bearing of the first ground joint, degrees.
        pub ground_yaw: f64,

        /// Circumradius of the platform joints (r).
        pub platform_radius: f64,

        /// Initial platform position.
        pub platform_position: Triple,

        /// Initial platform orientation (roll, pitch, yaw), degrees.
        pub platform_orientation: Triple,

        /// Shortest allowed leg (Lmin).
        pub min_length: f64,

        /// Longest allowed leg (Lmax).
        pub max_length: f64,

        /// Width of all stored values.
        pub precision: Precision,

        /// Descriptive only, has no kinematic effect.
        pub scale: f64,

        /// Destination of exported records.
        pub output: String,

        pub sampling: TargetSampling,
    }

    impl Default for Parameters {
        fn default() -> Self {
            Parameters {
                name: "RPR".to_string(),
                ground_radius: 100.0,
                ground_yaw: 90.0,
                platform_radius: 25.0,
                platform_position: [0.0; 3],
                platform_orientation: [0.0; 3],
                min_length: 10.0,
                max_length: 190.0,
                precision: Precision::Double,
                scale: 1.0,
                output: "test.csv".to_string(),
                sampling: TargetSampling::default(),
            }
        }
    }

    impl Parameters {
        pub fn singularity_check(&self) -> SingularityCheck {
            SingularityCheck::new(self.ground_radius, self.platform_radius)
        }

        /// Convert to string yaml representation (quick viewing, etc).
        pub fn to_yaml(&self) -> String {
            format!(
                "rpr_geometric_parameters:\n  \
              ground_radius: {}\n  \
              ground_yaw: {}\n  \
              platform_radius: {}\n  \
              platform_position: {}\n  \
              platform_orientation: {}\n\
            rpr_leg_bounds: [{}, {}]\n\
            precision: {}\n\
            scale: {}\n\
            name: {}\n\
            output: {}\n\
            sampling:\n  \
              radius: {}\n  \
              yaw_limits: [{}, {}]\n{}",
                self.ground_radius,
                self.ground_yaw,
                self.platform_radius,
                format_values(&self.platform_position, ", "),
                format_values(&self.platform_orientation, ", "),
                self.min_length,
                self.max_length,
                self.precision,
                self.scale,
                self.name,
                self.output,
                self.sampling.radius,
                self.sampling.yaw_limits[0],
                self.sampling.yaw_limits[1],
                self.sampling.max_attempts.map(|n| format!("  max_attempts: {}\n", n)).unwrap_or_default(),
            )
        }
    }
}
