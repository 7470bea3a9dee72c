//! Scripted drivers on rotation quaternion channels.

use serde::{Deserialize, Serialize};

use crate::constraint::Space;
use crate::expression::{Expr, ExpressionError};

/// Rotation quaternion component a driver writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuaternionChannel {
    W,
    X,
    Y,
    Z,
}

impl QuaternionChannel {
    /// Returns the component index (W = 0, X = 1, Y = 2, Z = 3).
    pub fn index(&self) -> usize {
        match self {
            QuaternionChannel::W => 0,
            QuaternionChannel::X => 1,
            QuaternionChannel::Y => 2,
            QuaternionChannel::Z => 3,
        }
    }

    /// Returns the channel for a component index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(QuaternionChannel::W),
            1 => Some(QuaternionChannel::X),
            2 => Some(QuaternionChannel::Y),
            3 => Some(QuaternionChannel::Z),
            _ => None,
        }
    }
}

/// Transform channel a driver variable reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformChannel {
    LocationX,
    LocationY,
    LocationZ,
    RotationX,
    RotationY,
    RotationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
}

impl TransformChannel {
    /// Returns the host transform type name.
    pub fn host_name(&self) -> &'static str {
        match self {
            TransformChannel::LocationX => "LOC_X",
            TransformChannel::LocationY => "LOC_Y",
            TransformChannel::LocationZ => "LOC_Z",
            TransformChannel::RotationX => "ROT_X",
            TransformChannel::RotationY => "ROT_Y",
            TransformChannel::RotationZ => "ROT_Z",
            TransformChannel::ScaleX => "SCALE_X",
            TransformChannel::ScaleY => "SCALE_Y",
            TransformChannel::ScaleZ => "SCALE_Z",
        }
    }
}

/// Input variable of a scripted driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverVariable {
    /// Identifier used in the expression.
    pub name: String,
    /// Bone whose transform is read.
    pub bone: String,
    /// Channel read from the bone.
    pub transform: TransformChannel,
    /// Space the channel is read in.
    pub space: Space,
}

/// A scripted driver bound to one quaternion channel of one bone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Driver {
    pub channel: QuaternionChannel,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<DriverVariable>,
}

impl Driver {
    /// Creates a scripted driver without variables.
    pub fn scripted(channel: QuaternionChannel, expression: impl Into<String>) -> Self {
        Self {
            channel,
            expression: expression.into(),
            variables: Vec::new(),
        }
    }

    /// Adds an input variable.
    pub fn with_variable(mut self, variable: DriverVariable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Parses the expression and checks that every identifier is bound.
    pub fn compile(&self) -> Result<Expr, ExpressionError> {
        let expr = Expr::parse(&self.expression)?;
        if let Some(unbound) = expr
            .variables()
            .into_iter()
            .find(|name| !self.variables.iter().any(|v| v.name == *name))
        {
            return Err(ExpressionError::UnboundVariable(unbound.to_string()));
        }
        Ok(expr)
    }

    /// Evaluates the driver, sampling each variable through `sample`.
    pub fn evaluate<F>(&self, sample: F) -> Result<f64, ExpressionError>
    where
        F: Fn(&DriverVariable) -> f64,
    {
        let expr = self.compile()?;
        expr.eval(&|name: &str| {
            self.variables
                .iter()
                .find(|v| v.name == name)
                .map(|v| sample(v))
        })
    }

    /// Rewrites variable sources reading bone `from` to read `to`.
    pub fn retarget(&mut self, from: &str, to: &str) -> usize {
        let mut count = 0;
        for variable in self.variables.iter_mut().filter(|v| v.bone == from) {
            variable.bone = to.to_string();
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scale_driver(expression: &str) -> Driver {
        Driver::scripted(QuaternionChannel::Z, expression).with_variable(DriverVariable {
            name: "var".into(),
            bone: "ThumbCtrl_L".into(),
            transform: TransformChannel::ScaleY,
            space: Space::Local,
        })
    }

    #[test]
    fn test_evaluate() {
        let driver = scale_driver("-(var - 1) * 2");
        assert_relative_eq!(driver.evaluate(|_| 1.0).unwrap(), 0.0);
        assert_relative_eq!(driver.evaluate(|_| 0.5).unwrap(), 1.0);
    }

    #[test]
    fn test_unbound_variable() {
        let driver = scale_driver("(other - 1) * 2");
        assert_eq!(
            driver.compile(),
            Err(ExpressionError::UnboundVariable("other".into()))
        );
    }

    #[test]
    fn test_channels() {
        assert_eq!(QuaternionChannel::Z.index(), 3);
        assert_eq!(QuaternionChannel::from_index(1), Some(QuaternionChannel::X));
        assert_eq!(QuaternionChannel::from_index(4), None);
        assert_eq!(TransformChannel::ScaleY.host_name(), "SCALE_Y");
    }

    #[test]
    fn test_retarget() {
        let mut driver = scale_driver("var");
        assert_eq!(driver.retarget("ThumbCtrl_L", "ThumbCtrl_R"), 1);
        assert_eq!(driver.variables[0].bone, "ThumbCtrl_R");
    }
}
