//! Supports extracting mechanism parameters from YAML file (optional)

use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};

use crate::geometry_error::GeometryError;
use crate::kinematic_traits::Triple;
use crate::parameters::rpr_kinematics::Parameters;

impl Parameters {
    /// Read the mechanism configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// rpr_geometric_parameters:
    ///   ground_radius: 100
    ///   ground_yaw: 90
    ///   platform_radius: 25
    ///   platform_position: [0, 0, 0]
    ///   platform_orientation: [0, 0, 0]
    /// rpr_leg_bounds: [10, 190]
    /// precision: f64
    /// name: RPR
    /// output: test.csv
    /// sampling:
    ///   radius: 50
    ///   yaw_limits: [10, 170]
    ///   max_attempts: 10000
    /// ```
    /// Every key is optional, missing keys keep the defaults of [`Parameters::default`].
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, GeometryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, GeometryError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| GeometryError::ParseError(e.to_string()))?;
        let mut parameters = Parameters::default();
        let Some(doc) = docs.first() else {
            return Ok(parameters);
        };

        let geometry = &doc["rpr_geometric_parameters"];
        set(&mut parameters.ground_radius, number(&geometry["ground_radius"], "ground_radius")?);
        set(&mut parameters.ground_yaw, number(&geometry["ground_yaw"], "ground_yaw")?);
        set(&mut parameters.platform_radius, number(&geometry["platform_radius"], "platform_radius")?);
        set(&mut parameters.platform_position, triple(&geometry["platform_position"], "platform_position")?);
        set(&mut parameters.platform_orientation, triple(&geometry["platform_orientation"], "platform_orientation")?);

        if let Some(bounds) = numbers(&doc["rpr_leg_bounds"], "rpr_leg_bounds")? {
            let [min, max] = <[f64; 2]>::try_from(bounds.as_slice()).map_err(|_| {
                GeometryError::shape("rpr_leg_bounds", "(2,)", format!("({},)", bounds.len()))
            })?;
            parameters.min_length = min;
            parameters.max_length = max;
        }

        if let Some(precision) = string(&doc["precision"], "precision")? {
            parameters.precision = precision.parse()?;
        }
        set(&mut parameters.scale, number(&doc["scale"], "scale")?);
        set(&mut parameters.name, string(&doc["name"], "name")?);
        set(&mut parameters.output, string(&doc["output"], "output")?);

        let sampling = &doc["sampling"];
        set(&mut parameters.sampling.radius, number(&sampling["radius"], "sampling.radius")?);
        if let Some(limits) = numbers(&sampling["yaw_limits"], "sampling.yaw_limits")? {
            parameters.sampling.yaw_limits = <[f64; 2]>::try_from(limits.as_slice()).map_err(|_| {
                GeometryError::shape("sampling.yaw_limits", "(2,)", format!("({},)", limits.len()))
            })?;
        }
        match &sampling["max_attempts"] {
            Yaml::Integer(n) if *n >= 0 => parameters.sampling.max_attempts = Some(*n as usize),
            Yaml::BadValue | Yaml::Null => {}
            other => return Err(wrong_type("sampling.max_attempts", "non negative integer", other)),
        }

        Ok(parameters)
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn wrong_type(key: &str, expected: &str, found: &Yaml) -> GeometryError {
    GeometryError::ParseError(format!("{} must be {}, got {:?}", key, expected, found))
}

/// `None` if the key is absent.
fn number(value: &Yaml, key: &str) -> Result<Option<f64>, GeometryError> {
    match value {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::Integer(i) => Ok(Some(*i as f64)),
        Yaml::Real(_) => value.as_f64().map(Some).ok_or_else(|| wrong_type(key, "a number", value)),
        other => Err(wrong_type(key, "a number", other)),
    }
}

fn numbers(value: &Yaml, key: &str) -> Result<Option<Vec<f64>>, GeometryError> {
    match value {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::Array(items) => items
            .iter()
            .map(|item| number(item, key)?.ok_or_else(|| wrong_type(key, "a list of numbers", value)))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        other => Err(wrong_type(key, "a list of numbers", other)),
    }
}

fn triple(value: &Yaml, key: &'static str) -> Result<Option<Triple>, GeometryError> {
    match numbers(value, key)? {
        None => Ok(None),
        Some(values) => <Triple>::try_from(values.as_slice())
            .map(Some)
            .map_err(|_| GeometryError::shape(key, "(3,)", format!("({},)", values.len()))),
    }
}

fn string(value: &Yaml, key: &str) -> Result<Option<String>, GeometryError> {
    match value {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::String(s) => Ok(Some(s.clone())),
        other => Err(wrong_type(key, "a string", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::Precision;

    #[test]
    fn test_yaml_round_trip() {
        let mut parameters = Parameters::default();
        parameters.ground_radius = 120.5;
        parameters.platform_orientation = [0.0, 0.0, 15.0];
        parameters.precision = Precision::Single;
        parameters.name = "bench".to_string();
        let parsed = Parameters::from_yaml_str(&parameters.to_yaml()).unwrap();
        assert_eq!(parsed, parameters);

        parameters.sampling.max_attempts = Some(250);
        let yaml = parameters.to_yaml();
        assert!(yaml.contains("  max_attempts: 250\n"));
        let parsed = Parameters::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.sampling.max_attempts, Some(250));
        assert_eq!(parsed, parameters);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let parsed = Parameters::from_yaml_str("rpr_leg_bounds: [25, 175]\n").unwrap();
        assert_eq!(parsed.min_length, 25.0);
        assert_eq!(parsed.max_length, 175.0);
        assert_eq!(parsed.ground_radius, 100.0);
        assert_eq!(Parameters::from_yaml_str("").unwrap(), Parameters::default());
    }

    #[test]
    fn test_sampling_section() {
        let parsed = Parameters::from_yaml_str(
            "sampling:\n  radius: 0.001\n  yaw_limits: [0, 0]\n  max_attempts: 100\n").unwrap();
        assert_eq!(parsed.sampling.radius, 0.001);
        assert_eq!(parsed.sampling.yaw_limits, [0.0, 0.0]);
        assert_eq!(parsed.sampling.max_attempts, Some(100));
    }

    #[test]
    fn test_wrong_shapes_and_types() {
        assert!(matches!(
            Parameters::from_yaml_str("rpr_geometric_parameters:\n  platform_position: [1, 2]\n"),
            Err(GeometryError::Shape { what: "platform_position", .. })
        ));
        assert!(matches!(
            Parameters::from_yaml_str("rpr_geometric_parameters:\n  ground_radius: wide\n"),
            Err(GeometryError::ParseError(_))
        ));
        assert!(Parameters::from_yaml_str("precision: f8\n").is_err());
        assert!(Parameters::from_yaml_str("rpr_leg_bounds: [1, 2, 3]\n").is_err());
    }
}
