//! Helpers for the presentation layer.

use std::collections::HashMap;

use lightspeed_core::constants::DEFAULT_SPRITE;

/// Look up a sprite by name, falling back to the default sprite when the
/// name is missing. `None` only if the default is missing too.
pub fn sprite_or_default<'a, V>(sprites: &'a HashMap<String, V>, name: &str) -> Option<&'a V> {
    sprites.get(name).or_else(|| sprites.get(DEFAULT_SPRITE))
}
