// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use printforge_core::{
    Axis, DimensionModel, DimensionSet, Extent3, GenerationConfig, ShellLayout, ShellNominal,
};
use printforge_geometry::{BodyProgram, Part, PrimitiveSpec};
use printforge_processing::assemblies::{AdvancedAmmoCan, AmmoCan, CarGarage, RobotHomeBase};
use printforge_processing::{
    shell_program, Assembly, ExportError, ExportedPart, Exporter, Manifest, PartRecipe, Pipeline,
    PipelineError, Stage, StlExporter,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "printforge_processing=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn pipeline() -> Pipeline {
    Pipeline::new(GenerationConfig::builtin()).unwrap()
}

/// Polygon area of a tessellated disc
fn disc_area(radius: f64, segments: usize) -> f64 {
    let n = segments as f64;
    0.5 * n * radius * radius * (std::f64::consts::TAU / n).sin()
}

/// Small test assembly with configurable recipes
struct Blocks {
    name: &'static str,
    wall: f64,
    programs: fn(&DimensionSet) -> Vec<BodyProgram>,
}

impl Assembly for Blocks {
    fn name(&self) -> &str {
        self.name
    }

    fn dimensions(&self, config: &GenerationConfig) -> printforge_core::Result<DimensionSet> {
        DimensionModel::new(
            ShellNominal::Outer(Extent3::new(20.0, 20.0, 10.0)),
            ShellLayout::open_top(),
            self.wall,
        )
        .resolve(&config.fit_table())
    }

    fn recipes(&self, dims: &DimensionSet) -> printforge_core::Result<Vec<PartRecipe>> {
        Ok((self.programs)(dims).into_iter().map(PartRecipe::new).collect())
    }
}

fn cube(name: &str, min: Extent3) -> BodyProgram {
    BodyProgram::new(name, PrimitiveSpec::cuboid_at("cube", Extent3::uniform(5.0), min))
}

#[test]
fn test_ammo_can_volumes() {
    init_tracing();
    let report = pipeline().run(&AmmoCan::new()).unwrap();
    assert!(report.is_complete());

    let names: Vec<_> = report.parts().map(Part::name).collect();
    assert_eq!(names, ["base", "lid"]);

    // Shell minus the 36x26x23 cavity plus the outer halves of two latch blocks
    let base = report.part("base").unwrap();
    let expected = 40.0 * 30.0 * 25.0 - 36.0 * 26.0 * 23.0 + 2.0 * (8.0 * 2.0 * 2.0);
    assert_relative_eq!(base.volume(), expected, max_relative = 1e-6);
    assert_relative_eq!(base.bounds().extent(Axis::Y), 32.0, epsilon = 1e-9);

    // Plate plus the lip below it, before the handle
    let lid = report.part("lid").unwrap();
    assert!(lid.volume() > 40.0 * 30.0 * 5.0 + 35.0 * 25.0 * 3.0);
    assert_relative_eq!(lid.bounds().min.z, 0.0, epsilon = 1e-9);
}

#[test]
fn test_advanced_ammo_can_latch() {
    let report = pipeline().run(&AdvancedAmmoCan::new()).unwrap();
    assert!(report.is_complete(), "{:?}", report.failures().collect::<Vec<_>>());
    assert_eq!(report.parts().count(), 6);

    // Body minus the pivot hole plus the part of the ramp above the body
    let latch = report.part("latch_left").unwrap();
    let hole = disc_area(0.85, GenerationConfig::DEFAULT_CYLINDER_SEGMENTS) * 2.0;
    let ramp_above = 4.0 * (0.5 * 3.0 * 5.0 - (3.0 * 2.0 - 0.3 * 2.0 * 2.0));
    assert_relative_eq!(
        latch.volume(),
        12.0 * 4.0 * 2.0 - hole + ramp_above,
        max_relative = 1e-6
    );

    let pin = report.part("pin_right").unwrap();
    assert_relative_eq!(
        pin.volume(),
        disc_area(0.75, GenerationConfig::DEFAULT_CYLINDER_SEGMENTS) * 4.0,
        max_relative = 1e-9
    );
}

#[test]
fn test_garage_door_windows() {
    let report = pipeline().run(&CarGarage::new()).unwrap();
    assert!(report.is_complete());

    let door = report.part("door").unwrap();
    let expected = 93.0 * 4.0 * 60.0 - 3.0 * (12.0 * 4.0 * 10.0);
    assert_relative_eq!(door.volume(), expected, max_relative = 1e-6);

    let garage = report.part("garage").unwrap();
    assert_relative_eq!(garage.bounds().extent(Axis::X), 100.0, epsilon = 1e-9);
    assert!(garage.volume() < 100.0 * 215.0 * 60.0 - 90.0 * 210.0 * 55.0);
}

#[test]
fn test_robot_base_is_split_to_bed() {
    init_tracing();
    let pipeline = pipeline();
    let report = pipeline.run(&RobotHomeBase::new()).unwrap();
    assert!(report.is_complete(), "{:?}", report.failures().collect::<Vec<_>>());

    let names: Vec<_> = report.parts().map(Part::name).collect();
    assert_eq!(names, ["body_part1", "body_part2", "door"]);

    let limit = pipeline.config().split_limit();
    for part in report.parts() {
        assert!(part.bounds().extent(Axis::Y) <= limit + 1e-9);
    }

    let door = report.part("door").unwrap();
    let expected = 221.0 * 4.0 * 90.0 - 3.0 * (30.0 * 4.0 * 10.0);
    assert_relative_eq!(door.volume(), expected, max_relative = 1e-6);
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = Pipeline::new(GenerationConfig {
        parallel: false,
        ..GenerationConfig::builtin()
    })
    .unwrap();
    let a = pipeline().run(&CarGarage::new()).unwrap();
    let b = sequential.run(&CarGarage::new()).unwrap();

    let volumes = |r: &printforge_processing::AssemblyReport| {
        r.parts()
            .map(|p| (p.name().to_string(), p.volume()))
            .collect::<Vec<_>>()
    };
    assert_eq!(volumes(&a), volumes(&b));
}

#[test]
fn test_failed_part_is_isolated() {
    let assembly = Blocks {
        name: "blocks",
        wall: 2.0,
        programs: |dims| {
            vec![
                shell_program("tray", dims),
                // Disjoint operands leave nothing to intersect
                cube("ghost", Extent3::uniform(0.0))
                    .intersection([PrimitiveSpec::cuboid_at(
                        "far",
                        Extent3::uniform(5.0),
                        Extent3::uniform(100.0),
                    )]),
                cube("block", Extent3::uniform(0.0)),
            ]
        },
    };

    let report = pipeline().run(&assembly).unwrap();
    assert!(!report.is_complete());

    let names: Vec<_> = report.parts().map(Part::name).collect();
    assert_eq!(names, ["tray", "block"]);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    let (role, error) = failures[0];
    assert_eq!(role, "ghost");
    assert_eq!(error.stage(), Stage::Build);
    assert_eq!(error.part(), Some("ghost"));
    assert!(matches!(
        error,
        PipelineError::Part {
            source: printforge_geometry::Error::DegenerateResult { .. },
            ..
        }
    ));
}

#[test]
fn test_dimension_failure_aborts_assembly() {
    let assembly = Blocks {
        name: "too_thick",
        wall: 12.0,
        programs: |_| Vec::new(),
    };
    match pipeline().run(&assembly) {
        Err(PipelineError::Dimensions { assembly, source }) => {
            assert_eq!(assembly, "too_thick");
            assert!(matches!(
                source,
                printforge_core::Error::InvalidDimension { .. }
            ));
        }
        other => panic!("Expected a dimensions failure, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_rejected() {
    let config = GenerationConfig {
        pivoting_clearance: 0.0,
        ..GenerationConfig::builtin()
    };
    assert!(matches!(
        Pipeline::new(config),
        Err(PipelineError::Config(_))
    ));
}

#[test]
fn test_export_writes_parts_and_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    let exporter = StlExporter::new(dir).with_combined(true);
    let report = pipeline()
        .run_and_export(&AmmoCan::new(), &exporter)
        .unwrap();
    assert!(report.is_complete());

    for file in ["ammo_can_base.stl", "ammo_can_lid.stl", "ammo_can_combined.stl"] {
        assert!(dir.join(file).is_file(), "missing {}", file);
    }

    // Binary STL size follows from the triangle count in the header
    let base = std::fs::read(dir.join("ammo_can_base.stl")).unwrap();
    let count = u32::from_le_bytes([base[80], base[81], base[82], base[83]]) as usize;
    assert_eq!(base.len(), 84 + 50 * count);

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("ammo_can_manifest.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["assembly"], "ammo_can");
    assert_eq!(manifest["parts"].as_array().unwrap().len(), 2);
    assert_eq!(manifest["parts"][0]["file"], "ammo_can_base.stl");
    assert_eq!(manifest["dimensions"]["inner_height"], 23.0);
    assert!(manifest["failures"].as_array().unwrap().is_empty());

    assert_eq!(report.files.len(), 4);
}

#[test]
fn test_duplicate_part_names_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    let assembly = Blocks {
        name: "dupes",
        wall: 2.0,
        programs: |_| {
            vec![
                cube("block", Extent3::uniform(0.0)),
                cube("block", Extent3::uniform(10.0)),
            ]
        },
    };

    let report = pipeline()
        .run_and_export(&assembly, &StlExporter::new(dir))
        .unwrap();

    assert_eq!(report.parts().count(), 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].1.stage(), Stage::Export);
    assert!(matches!(
        failures[0].1,
        PipelineError::Export {
            source: ExportError::DuplicatePart(_),
            ..
        }
    ));
    assert!(dir.join("dupes_block.stl").is_file());

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("dupes_manifest.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["failures"][0]["stage"], "export");
}

/// Writes parts normally but cannot write a manifest
struct NoManifest(StlExporter);

impl Exporter for NoManifest {
    fn write_part(&self, assembly: &str, part: &Part) -> Result<ExportedPart, ExportError> {
        self.0.write_part(assembly, part)
    }

    fn write_manifest(
        &self,
        _assembly: &str,
        _manifest: &Manifest,
    ) -> Result<std::path::PathBuf, ExportError> {
        Err(ExportError::Io {
            path: self.0.dir().join("manifest.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

#[test]
fn test_manifest_failure_keeps_written_files() {
    let tmp = tempfile::tempdir().unwrap();
    let exporter = NoManifest(StlExporter::new(tmp.path()));
    let pipeline = pipeline();
    let mut report = pipeline.run(&AmmoCan::new()).unwrap();

    match pipeline.export(&mut report, &exporter) {
        Err(PipelineError::Export { part, .. }) => assert_eq!(part, "manifest"),
        other => panic!("Expected a manifest export failure, got {:?}", other),
    }

    assert_eq!(report.files.len(), 2);
    for file in &report.files {
        assert!(file.is_file(), "missing {}", file.display());
    }
}
