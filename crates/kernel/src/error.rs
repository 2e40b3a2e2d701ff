use quadsim_common::VehicleId;

/// Errors surfaced by the flight core.
///
/// Every variant is raised before any state is touched, so a rejected call
/// leaves the vehicle exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlightError {
    #[error("invalid input: {what} = {value}")]
    InvalidInput { what: &'static str, value: f32 },
    #[error("invalid configuration: {field} = {value}, expected {expected}")]
    InvalidConfiguration {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
    #[error("vehicle {0} not found")]
    UnknownVehicle(VehicleId),
}

impl FlightError {
    pub(crate) fn config(field: &'static str, value: f32, expected: &'static str) -> Self {
        Self::InvalidConfiguration {
            field,
            value,
            expected,
        }
    }
}

/// Reject a negative or non-finite timestep. Zero is a valid no-op slice.
pub(crate) fn check_dt(dt: f32) -> Result<(), FlightError> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(FlightError::InvalidInput { what: "dt", value: dt });
    }
    Ok(())
}

pub(crate) fn check_inputs(inputs: &quadsim_common::ControlInputs) -> Result<(), FlightError> {
    match inputs.first_non_finite() {
        Some((what, value)) => Err(FlightError::InvalidInput { what, value }),
        None => Ok(()),
    }
}
