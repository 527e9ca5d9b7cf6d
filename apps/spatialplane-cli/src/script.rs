use std::path::Path;

use anyhow::{Context, bail};
use glam::Vec2;
use spatialplane_input::Action;

/// Parse a YAML input script: a sequence of actions such as
///
/// ```yaml
/// - steer: [100, 0]
/// - wait: 0.25
/// - tap: [195, 422]
/// - release
/// ```
pub fn parse_script(text: &str) -> anyhow::Result<Vec<Action>> {
    // Actions are written as single-key maps, not YAML tags.
    let actions: Vec<Action> = serde_yaml::with::singleton_map_recursive::deserialize(
        serde_yaml::Deserializer::from_str(text),
    )
    .context("malformed script")?;
    for (i, action) in actions.iter().enumerate() {
        if let Action::Wait(dt) = action {
            if !(dt.is_finite() && *dt >= 0.0) {
                bail!("action {i}: wait of {dt} seconds");
            }
        }
    }
    Ok(actions)
}

pub fn load_script(path: &Path) -> anyhow::Result<Vec<Action>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("in {}", path.display()))
}

/// Parse `"x,y"` into a vector, for command-line values.
pub fn parse_vec2(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action_kind() {
        let script = "- steer: [100, 0]\n- wait: 0.25\n- tap: [195.5, 422]\n- release\n";
        let actions = parse_script(script).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Steer(Vec2::new(100.0, 0.0)),
                Action::Wait(0.25),
                Action::Tap(Vec2::new(195.5, 422.0)),
                Action::Release,
            ]
        );
    }

    #[test]
    fn shipped_script_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/loop.yaml");
        let actions = load_script(&path).unwrap();
        assert_eq!(actions.len(), 9);
        assert_eq!(actions[0], Action::Steer(Vec2::new(60.0, 0.0)));
        assert_eq!(actions[5], Action::Tap(Vec2::new(195.0, 422.0)));
        assert_eq!(actions[8], Action::Release);
    }

    #[test]
    fn empty_script_is_empty() {
        assert!(parse_script("[]").unwrap().is_empty());
    }

    #[test]
    fn negative_wait_is_rejected() {
        assert!(parse_script("- wait: -1.0\n").is_err());
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(parse_script("- jump: 3\n").is_err());
    }

    #[test]
    fn vec2_from_command_line() {
        assert_eq!(parse_vec2("100,0"), Ok(Vec2::new(100.0, 0.0)));
        assert_eq!(parse_vec2(" -3.5 , 2 "), Ok(Vec2::new(-3.5, 2.0)));
        assert!(parse_vec2("100").is_err());
        assert!(parse_vec2("a,b").is_err());
    }
}
