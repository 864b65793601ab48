//! View configuration.
//!
//! Every field has a default; JSON overrides are deep-merged onto the defaults, so a caller
//! only spells out what differs (`{"force": {"chargeStrength": -300}}`).

use crate::classify::Palette;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_CHARGE_STRENGTH: f64 = -500.0;
pub const MAX_CHARGE_STRENGTH: f64 = -100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub width: f64,
    pub height: f64,
    /// Sibling spacing in the tree, link distance in the force layout.
    pub node_spacing: f64,
    /// Horizontal distance between tree levels.
    pub level_spacing: f64,
    /// Subtracted from `width` for the tidy-tree pass.
    pub tree_width_inset: f64,
    pub node_radius: f64,
    /// Space around the `width` x `height` plot area on the drawing surface.
    pub margin: Margin,
    pub force: ForceConfig,
    pub overlay: OverlayConfig,
    /// Color overrides keyed by kind name (`hot`, `plain-shard`, ...).
    pub palette: IndexMap<String, String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1800.0,
            height: 900.0,
            node_spacing: 100.0,
            level_spacing: 200.0,
            tree_width_inset: 600.0,
            node_radius: 10.0,
            margin: Margin::default(),
            force: ForceConfig::default(),
            overlay: OverlayConfig::default(),
            palette: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 300.0,
            bottom: 30.0,
            left: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragReleasePolicy {
    #[default]
    KeepPinned,
    Release,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceConfig {
    pub charge_strength: f64,
    /// Barnes-Hut accuracy of the charge force; `0` sums every pair.
    pub theta: f64,
    pub collision: bool,
    pub collision_buffer: f64,
    pub alpha_min: f64,
    /// `None` derives the decay that cools to `alpha_min` in 300 steps.
    pub alpha_decay: Option<f64>,
    pub velocity_decay: f64,
    pub drag_alpha_target: f64,
    pub drag_release: DragReleasePolicy,
    pub random_seed: u64,
    pub max_steps: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge_strength: -100.0,
            theta: 0.9,
            collision: true,
            collision_buffer: 20.0,
            alpha_min: 0.001,
            alpha_decay: None,
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            drag_release: DragReleasePolicy::KeepPinned,
            random_seed: 1,
            max_steps: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// The anchor sits this far left of the right edge.
    pub offset_x: f64,
    pub anchor_radius: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            offset_x: 250.0,
            anchor_radius: 7.0,
        }
    }
}

impl ViewConfig {
    pub fn from_value(overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(Self::default()).map_err(invalid)?;
        deep_merge_value(&mut base, overrides);
        let config: Self = serde_json::from_value(base).map_err(invalid)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(invalid)?;
        Self::from_value(&value)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("nodeSpacing", self.node_spacing),
            ("levelSpacing", self.level_spacing),
            ("nodeRadius", self.node_radius),
            ("force.alphaMin", self.force.alpha_min),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a positive number, got {v}"),
                });
            }
        }
        if !(self.tree_width_inset.is_finite() && self.tree_width_inset < self.width) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "treeWidthInset ({}) must be smaller than width ({})",
                    self.tree_width_inset, self.width
                ),
            });
        }
        let charge = self.force.charge_strength;
        if !(MIN_CHARGE_STRENGTH..=MAX_CHARGE_STRENGTH).contains(&charge) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "force.chargeStrength must be within {MIN_CHARGE_STRENGTH}..={MAX_CHARGE_STRENGTH}, got {charge}"
                ),
            });
        }
        if !(self.force.theta.is_finite() && self.force.theta >= 0.0) {
            return Err(Error::InvalidConfig {
                message: format!("force.theta must be >= 0, got {}", self.force.theta),
            });
        }
        if !(self.force.collision_buffer.is_finite() && self.force.collision_buffer >= 0.0) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "force.collisionBuffer must be >= 0, got {}",
                    self.force.collision_buffer
                ),
            });
        }
        let m = &self.margin;
        for (name, v) in [
            ("margin.top", m.top),
            ("margin.right", m.right),
            ("margin.bottom", m.bottom),
            ("margin.left", m.left),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be >= 0, got {v}"),
                });
            }
        }
        if !self.overlay.offset_x.is_finite() {
            return Err(Error::InvalidConfig {
                message: "overlay.offsetX must be finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn palette(&self) -> Palette {
        Palette::with_overrides(&self.palette)
    }
}

fn invalid(e: serde_json::Error) -> Error {
    Error::InvalidConfig {
        message: e.to_string(),
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::deep_merge_value;
    use serde_json::json;

    #[test]
    fn deep_merge_keeps_untouched_siblings() {
        let mut base = json!({"force": {"chargeStrength": -100, "collision": true}, "width": 1});
        deep_merge_value(&mut base, &json!({"force": {"chargeStrength": -300}}));
        assert_eq!(
            base,
            json!({"force": {"chargeStrength": -300, "collision": true}, "width": 1})
        );
    }
}
