//! TOML scenario files understood by the command-line adapter.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use flash_point_core::Scenario;
use serde::Deserialize;

const SUPPORTED_SCENARIO_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    version: u32,
    #[serde(flatten)]
    scenario: Scenario,
}

/// Loads the scenario stored at the provided path.
pub(crate) fn load(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid scenario file {}", path.display()))
}

/// Parses scenario file contents.
pub(crate) fn parse(contents: &str) -> Result<Scenario> {
    let file: ScenarioFile =
        toml::from_str(contents).context("failed to parse scenario toml contents")?;
    if file.version != SUPPORTED_SCENARIO_VERSION {
        bail!(
            "unsupported scenario version {}; expected {}",
            file.version,
            SUPPORTED_SCENARIO_VERSION
        );
    }
    Ok(file.scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flash_point_core::{
        Barrier, CellCoord, DoorState, PoiSeed, Rules, VictoryRule, WallState,
    };

    #[test]
    fn parses_a_complete_scenario() {
        let contents = r#"
            version = 1
            columns = 3
            rows = 2
            fires = [{ column = 0, row = 0 }, { column = 2, row = 1 }]

            [[pois]]
            cell = { column = 1, row = 1 }
            seed = "victim"

            [[pois]]
            cell = { column = 1, row = 0 }
            seed = "hidden"

            [[barriers]]
            from = { column = 0, row = 0 }
            to = { column = 1, row = 0 }
            barrier = { door = "closed" }

            [[barriers]]
            from = { column = 2, row = 0 }
            to = { column = 2, row = 1 }
            barrier = { wall = "intact" }

            [rules]
            collapse_threshold = 10
            victory = "all_victims"
        "#;

        let scenario = parse(contents).expect("scenario parses");

        let expected = Scenario::new(3, 2)
            .with_fire(CellCoord::new(0, 0))
            .with_fire(CellCoord::new(2, 1))
            .with_poi(CellCoord::new(1, 1), PoiSeed::Victim)
            .with_poi(CellCoord::new(1, 0), PoiSeed::Hidden)
            .with_barrier(
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                Barrier::Door(DoorState::Closed),
            )
            .with_barrier(
                CellCoord::new(2, 0),
                CellCoord::new(2, 1),
                Barrier::Wall(WallState::Intact),
            )
            .with_rules(
                Rules::default()
                    .with_collapse_threshold(10)
                    .with_victory(VictoryRule::AllVictims),
            );
        assert_eq!(scenario, expected);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let scenario = parse("version = 1\ncolumns = 4\nrows = 4\n").expect("scenario parses");
        assert_eq!(scenario, Scenario::new(4, 4));
    }

    #[test]
    fn fixed_victory_targets_are_read() {
        let contents = "version = 1\ncolumns = 2\nrows = 2\n[rules]\nvictory = { fixed = 3 }\n";
        let scenario = parse(contents).expect("scenario parses");
        assert_eq!(scenario.rules.victory, VictoryRule::Fixed(3));
        assert_eq!(scenario.rules.max_lost_victims, Rules::default().max_lost_victims);
    }

    #[test]
    fn rejects_unknown_versions() {
        let error = parse("version = 2\ncolumns = 1\nrows = 1\n").expect_err("version 2");
        assert!(error.to_string().contains("unsupported scenario version 2"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(parse("columns = [").is_err());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = load(Path::new("does/not/exist.toml")).expect_err("missing file");
        assert!(format!("{error}").contains("does/not/exist.toml"));
    }
}
