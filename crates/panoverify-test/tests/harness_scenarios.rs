//! End-to-end harness runs against a scripted stand-in for the projector.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use panoverify_core::{face_path, face_relative_path, tile_path, FaceId, PyramidLayout};
use panoverify_test::{
    CheckLabel, CheckOutcome, Comparison, Harness, HarnessConfig, HarnessError, Invocation,
    ProcessOutcome, Report, TestContext, ToolRunner,
};
use tempfile::TempDir;

/// Writes golden bytes where the real projector would write its output.
struct FakeProjector {
    golden: PathBuf,
    layout: PyramidLayout,
    face_exit: HashMap<FaceId, i32>,
    pyramid_exit: i32,
    /// Outputs written with one byte flipped, by relative name.
    corrupt: HashSet<String>,
    /// Outputs never written, by relative name.
    skip: HashSet<String>,
    /// Exit 0 without writing anything.
    write_nothing: bool,
    invocations: Vec<Invocation>,
}

impl FakeProjector {
    fn new(ctx: &TestContext) -> Self {
        Self {
            golden: ctx.expected_dir.clone(),
            layout: ctx.layout.clone(),
            face_exit: HashMap::new(),
            pyramid_exit: 0,
            corrupt: HashSet::new(),
            skip: HashSet::new(),
            write_nothing: false,
            invocations: Vec::new(),
        }
    }

    fn corrupting(mut self, name: &str) -> Self {
        self.corrupt.insert(name.to_string());
        self
    }

    fn skipping(mut self, name: &str) -> Self {
        self.skip.insert(name.to_string());
        self
    }

    fn emit(&self, name: &str, from: &Path, to: &Path) {
        if self.write_nothing || self.skip.contains(name) {
            return;
        }
        let mut bytes = fs::read(from).unwrap();
        if self.corrupt.contains(name) {
            let mid = bytes.len() / 2;
            bytes[mid] ^= 0x01;
        }
        fs::create_dir_all(to.parent().unwrap()).unwrap();
        fs::write(to, bytes).unwrap();
    }
}

impl ToolRunner for FakeProjector {
    fn run(&mut self, invocation: &Invocation) -> panoverify_test::Result<ProcessOutcome> {
        self.invocations.push(invocation.clone());
        let output = PathBuf::from(&invocation.arguments()[3]);

        match invocation.arg_str(0) {
            Some("face") => {
                let face: FaceId = invocation
                    .arg_str(1)
                    .and_then(|a| a.strip_prefix("--face="))
                    .unwrap()
                    .parse()
                    .unwrap();
                if let Some(&code) = self.face_exit.get(&face) {
                    return Ok(ProcessOutcome::from_code(code));
                }
                let name = face_relative_path(face).display().to_string();
                self.emit(&name, &face_path(&self.golden, face), &output);
            }
            Some("pyramid") => {
                assert!(invocation.arg_str(1).unwrap().starts_with("--tile-size="));
                if self.pyramid_exit != 0 {
                    return Ok(ProcessOutcome::from_code(self.pyramid_exit));
                }
                for address in self.layout.addresses() {
                    self.emit(
                        &address.to_string(),
                        &tile_path(&self.golden, address),
                        &tile_path(&output, address),
                    );
                }
            }
            other => panic!("unexpected mode {other:?}"),
        }
        Ok(ProcessOutcome::Success)
    }
}

/// Source tree with an input image and golden outputs, plus an empty build tree.
struct Fixture {
    _source: TempDir,
    _build: TempDir,
    ctx: TestContext,
}

fn fixture(config: HarnessConfig) -> Fixture {
    let source = TempDir::new().unwrap();
    let build = TempDir::new().unwrap();
    let ctx = config.resolve(source.path(), build.path()).unwrap();

    fs::create_dir_all(ctx.input_image.parent().unwrap()).unwrap();
    fs::write(&ctx.input_image, b"equirectangular").unwrap();

    fs::create_dir_all(&ctx.expected_dir).unwrap();
    for &face in ctx.faces() {
        fs::write(face_path(&ctx.expected_dir, face), format!("golden face {face}")).unwrap();
    }
    for address in ctx.layout.addresses() {
        let path = tile_path(&ctx.expected_dir, address);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("golden tile {address}")).unwrap();
    }

    Fixture {
        _source: source,
        _build: build,
        ctx,
    }
}

fn run(ctx: &TestContext, tool: FakeProjector) -> (Report, FakeProjector) {
    let mut harness = Harness::new(ctx.clone(), tool);
    let report = harness.run().unwrap();
    (report, harness.into_runner())
}

fn failed_labels(report: &Report) -> Vec<String> {
    report
        .results()
        .iter()
        .filter(|r| !r.passed())
        .map(|r| r.label.to_string())
        .collect()
}

#[test]
fn all_outputs_match() {
    let fx = fixture(HarnessConfig::new());
    let (report, tool) = run(&fx.ctx, FakeProjector::new(&fx.ctx));

    assert!(report.all_passed(), "{report}");
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.results().len(), 7);
    assert_eq!(tool.invocations.len(), 7);

    let pyramid = report.get(CheckLabel::Pyramid).unwrap();
    assert_eq!(pyramid.comparisons, 30);
    assert!(face_path(&fx.ctx.result_dir, FaceId::Back).is_file());
}

#[test]
fn invocations_follow_face_order_then_pyramid() {
    let fx = fixture(HarnessConfig::new());
    let (_, tool) = run(&fx.ctx, FakeProjector::new(&fx.ctx));

    let modes: Vec<String> = tool
        .invocations
        .iter()
        .map(|inv| {
            format!(
                "{} {}",
                inv.arg_str(0).unwrap(),
                inv.arg_str(1).unwrap()
            )
        })
        .collect();
    assert_eq!(
        modes,
        [
            "face --face=b",
            "face --face=l",
            "face --face=f",
            "face --face=r",
            "face --face=u",
            "face --face=d",
            "pyramid --tile-size=128",
        ]
    );
    let pyramid = tool.invocations.last().unwrap();
    assert_eq!(PathBuf::from(&pyramid.arguments()[2]), fx.ctx.input_image);
    assert_eq!(PathBuf::from(&pyramid.arguments()[3]), fx.ctx.result_dir);
}

#[test]
fn one_differing_byte_fails_only_that_face() {
    let fx = fixture(HarnessConfig::new());
    let tool = FakeProjector::new(&fx.ctx).corrupting("f.jpg");
    let (report, tool) = run(&fx.ctx, tool);

    assert_eq!(failed_labels(&report), ["Face f"]);
    assert_eq!(report.exit_code(), 1);
    // Remaining faces and the pyramid still ran.
    assert_eq!(tool.invocations.len(), 7);

    let face = report.get(CheckLabel::Face(FaceId::Front)).unwrap();
    assert_eq!(face.mismatches().len(), 1);
    assert_eq!(face.mismatches()[0].file, "f.jpg");
    assert!(matches!(
        face.mismatches()[0].comparison,
        Comparison::ContentDiffers { .. }
    ));
}

#[test]
fn pyramid_tool_failure_skips_all_comparisons() {
    let fx = fixture(HarnessConfig::new());
    let mut tool = FakeProjector::new(&fx.ctx);
    tool.pyramid_exit = 2;
    let (report, _) = run(&fx.ctx, tool);

    let pyramid = report.get(CheckLabel::Pyramid).unwrap();
    assert_eq!(
        pyramid.outcome,
        CheckOutcome::ToolFailed(ProcessOutcome::Failed { code: Some(2) })
    );
    assert_eq!(pyramid.comparisons, 0);
    assert_eq!(failed_labels(&report), ["Pyramid"]);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn single_tile_mismatch_is_named_and_walk_continues() {
    let fx = fixture(HarnessConfig::new());
    let tool = FakeProjector::new(&fx.ctx).corrupting("2/l1_0.jpg");
    let (report, _) = run(&fx.ctx, tool);

    let pyramid = report.get(CheckLabel::Pyramid).unwrap();
    let names: Vec<&str> = pyramid.mismatches().iter().map(|m| m.file.as_str()).collect();
    assert_eq!(names, ["2/l1_0.jpg"]);
    assert_eq!(pyramid.comparisons, 30);
    assert_eq!(failed_labels(&report), ["Pyramid"]);
    assert!(report
        .to_string()
        .contains("mismatch: 2/l1_0.jpg (content differs at byte"));
}

#[test]
fn every_mismatching_tile_is_reported() {
    let fx = fixture(HarnessConfig::new());
    let tool = FakeProjector::new(&fx.ctx)
        .corrupting("1/b0_0.jpg")
        .corrupting("2/d1_1.jpg")
        .skipping("2/u0_1.jpg");
    let (report, _) = run(&fx.ctx, tool);

    let pyramid = report.get(CheckLabel::Pyramid).unwrap();
    let names: Vec<&str> = pyramid.mismatches().iter().map(|m| m.file.as_str()).collect();
    assert_eq!(names, ["1/b0_0.jpg", "2/u0_1.jpg", "2/d1_1.jpg"]);
    assert!(matches!(
        pyramid.mismatches()[1].comparison,
        Comparison::ActualUnreadable(_)
    ));
}

#[test]
fn face_tool_failure_does_not_stop_the_run() {
    let fx = fixture(HarnessConfig::new());
    let mut tool = FakeProjector::new(&fx.ctx);
    tool.face_exit.insert(FaceId::Up, 3);
    let (report, tool) = run(&fx.ctx, tool);

    let up = report.get(CheckLabel::Face(FaceId::Up)).unwrap();
    assert_eq!(
        up.outcome,
        CheckOutcome::ToolFailed(ProcessOutcome::Failed { code: Some(3) })
    );
    assert_eq!(up.comparisons, 0);
    assert_eq!(failed_labels(&report), ["Face u"]);
    assert_eq!(tool.invocations.len(), 7);
}

#[test]
fn missing_golden_file_fails_closed() {
    let fx = fixture(HarnessConfig::new());
    fs::remove_file(face_path(&fx.ctx.expected_dir, FaceId::Down)).unwrap();
    let (report, _) = run(&fx.ctx, FakeProjector::new(&fx.ctx));

    let down = report.get(CheckLabel::Face(FaceId::Down)).unwrap();
    assert!(matches!(
        down.mismatches()[0].comparison,
        Comparison::ExpectedUnreadable(_)
    ));
    assert_eq!(failed_labels(&report), ["Face d"]);
}

#[test]
fn stale_results_never_satisfy_a_comparison() {
    let fx = fixture(HarnessConfig::new());
    // A previous good run left correct outputs behind.
    let (first, _) = run(&fx.ctx, FakeProjector::new(&fx.ctx));
    assert!(first.all_passed());

    let mut silent = FakeProjector::new(&fx.ctx);
    silent.write_nothing = true;
    let (report, _) = run(&fx.ctx, silent);

    assert_eq!(report.passed_count(), 0);
    assert_eq!(report.get(CheckLabel::Pyramid).unwrap().mismatches().len(), 30);
}

#[test]
fn repeated_runs_agree() {
    let fx = fixture(HarnessConfig::new());
    let (first, _) = run(&fx.ctx, FakeProjector::new(&fx.ctx).corrupting("2/r0_1.jpg"));
    let (second, _) = run(&fx.ctx, FakeProjector::new(&fx.ctx).corrupting("2/r0_1.jpg"));
    assert_eq!(first, second);
}

#[test]
fn wider_layout_walks_more_levels() {
    let config = HarnessConfig::new()
        .with_tile_size(64)
        .with_faces_and_levels([FaceId::Left, FaceId::Up], 3)
        .unwrap();
    let fx = fixture(config);
    let tool = FakeProjector::new(&fx.ctx).corrupting("3/u3_2.jpg");
    let (report, tool) = run(&fx.ctx, tool);

    assert_eq!(report.results().len(), 3);
    assert_eq!(tool.invocations.len(), 3);
    assert_eq!(tool.invocations[2].arg_str(1), Some("--tile-size=64"));

    let pyramid = report.get(CheckLabel::Pyramid).unwrap();
    assert_eq!(pyramid.comparisons, 2 * (1 + 4 + 16));
    assert_eq!(pyramid.mismatches()[0].file, "3/u3_2.jpg");
}

#[test]
fn unusable_scratch_directory_is_fatal() {
    let source = TempDir::new().unwrap();
    let not_a_dir = source.path().join("build");
    fs::write(&not_a_dir, b"file, not a directory").unwrap();

    let ctx = HarnessConfig::new()
        .resolve(source.path(), &not_a_dir)
        .unwrap();
    let mut harness = Harness::new(ctx.clone(), FakeProjector::new(&ctx));
    let err = harness.run().unwrap_err();

    assert!(matches!(err, HarnessError::Setup { .. }));
    assert!(harness.runner().invocations.is_empty());
}
