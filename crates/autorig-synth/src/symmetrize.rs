//! Name symmetrizer.
//!
//! Rewrites vendor bone names such as `J_Bip_L_Hand` into the canonical
//! `{Part}{Index}_{Side}` form (`Hand_L`). Rules are tried in order and the
//! first match wins:
//!
//! 1. `^J_(Adj|Bip|Opt|Sec)_L_` is stripped and `_L` appended.
//! 2. `^J_(Adj|Bip|Opt|Sec)_R_` is stripped and `_R` appended.
//! 3. `^J_(Adj|Bip|Opt|Sec)_([CLR]_)?` is stripped.
//!
//! Rules are reapplied until none matches, so `J_Bip_C_J_Adj_Head` becomes
//! `Head`. Names matching no rule are left alone, so canonical names are
//! fixed points.

use std::collections::HashSet;
use std::sync::OnceLock;

use autorig_skeleton::{RigError, RigResult, Side, Skeleton};
use regex::Regex;

const LEFT_PATTERN: &str = r"^J_(Adj|Bip|Opt|Sec)_L_";
const RIGHT_PATTERN: &str = r"^J_(Adj|Bip|Opt|Sec)_R_";
const GENERIC_PATTERN: &str = r"^J_(Adj|Bip|Opt|Sec)_([CLR]_)?";

static LEFT_REGEX: OnceLock<Regex> = OnceLock::new();
static RIGHT_REGEX: OnceLock<Regex> = OnceLock::new();
static GENERIC_REGEX: OnceLock<Regex> = OnceLock::new();

fn left_regex() -> &'static Regex {
    LEFT_REGEX.get_or_init(|| Regex::new(LEFT_PATTERN).expect("invalid regex pattern"))
}

fn right_regex() -> &'static Regex {
    RIGHT_REGEX.get_or_init(|| Regex::new(RIGHT_PATTERN).expect("invalid regex pattern"))
}

fn generic_regex() -> &'static Regex {
    GENERIC_REGEX.get_or_init(|| Regex::new(GENERIC_PATTERN).expect("invalid regex pattern"))
}

fn strip<'a>(regex: &Regex, name: &'a str) -> Option<&'a str> {
    regex.find(name).map(|m| &name[m.end()..])
}

fn rewrite_once(name: &str) -> Option<String> {
    if let Some(rest) = strip(left_regex(), name) {
        return Some(format!("{}_{}", rest, Side::Left.letter()));
    }
    if let Some(rest) = strip(right_regex(), name) {
        return Some(format!("{}_{}", rest, Side::Right.letter()));
    }
    strip(generic_regex(), name).map(str::to_string)
}

/// Returns the canonical form of `name`, or `None` if no rule applies.
///
/// Every rewrite removes a vendor prefix, so repeating until no rule matches
/// terminates.
pub fn canonical_name(name: &str) -> Option<String> {
    let mut canonical = rewrite_once(name)?;
    while let Some(next) = rewrite_once(&canonical) {
        canonical = next;
    }
    Some(canonical)
}

/// Computes the rename plan without touching the skeleton.
///
/// Fails with a name collision if two bones would end up with the same
/// name, either because a rewritten name is already taken by a bone that
/// keeps its name or because two rewrites produce the same name.
pub fn plan_renames(skeleton: &Skeleton) -> RigResult<Vec<(String, String)>> {
    let mut plan = Vec::new();
    let mut kept = HashSet::new();
    for name in skeleton.bone_names() {
        match canonical_name(name) {
            Some(canonical) if canonical != name => plan.push((name.to_string(), canonical)),
            _ => {
                kept.insert(name);
            }
        }
    }

    let mut produced = HashSet::new();
    for (from, to) in &plan {
        if kept.contains(to.as_str()) || !produced.insert(to.as_str()) {
            return Err(RigError::NameCollision {
                from: from.clone(),
                to: to.clone(),
            });
        }
    }
    Ok(plan)
}

/// Renames every vendor-prefixed bone into canonical form.
///
/// The whole plan is checked for collisions before any bone is renamed, so a
/// failing call leaves the skeleton untouched. Returns the applied
/// `(old, new)` pairs.
pub fn symmetrize_names(skeleton: &mut Skeleton) -> RigResult<Vec<(String, String)>> {
    let plan = plan_renames(skeleton)?;
    if plan.is_empty() {
        tracing::debug!("bone names already canonical");
        return Ok(plan);
    }

    {
        // Targets are fixed points, so no target is held by a bone still
        // waiting to be renamed.
        let mut edit = skeleton.edit();
        for (from, to) in &plan {
            edit.rename(from, to)?;
        }
    }

    tracing::info!(renamed = plan.len(), "symmetrized bone names");
    Ok(plan)
}
