//! Idempotent constraint and driver binding.
//!
//! Both operations address their entity by a stable key, `(bone, name)` for
//! constraints and `(bone, channel)` for drivers, so repeated synthesis
//! updates in place instead of accumulating duplicates.

use autorig_skeleton::{
    Constraint, ConstraintParams, Driver, DriverVariable, QuaternionChannel, RigError, RigResult,
    Skeleton, Space, TransformChannel,
};

use crate::names::DRIVER_VARIABLE;

/// Finds or creates the constraint `name` on `bone` and applies `configure`.
///
/// A new constraint starts from `P::default()` with influence 1.0; an
/// existing one keeps every field `configure` does not touch. Fails if the
/// bone is missing or the existing constraint has another type.
pub fn upsert_constraint<'s, P, F>(
    skeleton: &'s mut Skeleton,
    bone: &str,
    name: &str,
    configure: F,
) -> RigResult<&'s mut Constraint>
where
    P: ConstraintParams,
    F: FnOnce(&mut P),
{
    let owner = skeleton.bone_mut(bone)?;
    let constraint = owner.constraint_entry(name, || Constraint::new::<P>(name));
    let found = constraint.type_name();
    let params =
        constraint
            .params_mut::<P>()
            .ok_or_else(|| RigError::ConstraintTypeMismatch {
                bone: bone.to_string(),
                name: name.to_string(),
                expected: P::TYPE_NAME,
                found,
            })?;
    configure(params);
    Ok(constraint)
}

/// Replaces the driver on `bone`'s quaternion `channel`.
///
/// The new driver reads `source_bone`'s `source_channel` in local space
/// through a single variable and maps it with `expression`.
pub fn set_driver<'s>(
    skeleton: &'s mut Skeleton,
    bone: &str,
    channel: QuaternionChannel,
    source_bone: &str,
    source_channel: TransformChannel,
    expression: &str,
) -> RigResult<&'s mut Driver> {
    skeleton.require(source_bone)?;
    let driver = Driver::scripted(channel, expression).with_variable(DriverVariable {
        name: DRIVER_VARIABLE.to_string(),
        bone: source_bone.to_string(),
        transform: source_channel,
        space: Space::Local,
    });
    driver.compile()?;

    let owner = skeleton.bone_mut(bone)?;
    owner.remove_driver(channel);
    Ok(owner.add_driver(driver))
}
