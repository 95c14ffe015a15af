//! Behavioural tests for OS detection and configuration loading.

use camino::Utf8PathBuf;
use distkit_common::config::CONFIG_FILE_NAME;
use distkit_common::{ConfigError, OsFamily, ProjectConfig, StubEnvironment};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Default)]
struct PlatformWorld {
    env: RefCell<Option<StubEnvironment>>,
    family: RefCell<Option<OsFamily>>,
    project: RefCell<Option<TempDir>>,
    loaded: RefCell<Option<Result<ProjectConfig, ConfigError>>>,
}

impl PlatformWorld {
    fn project_dir(&self) -> Utf8PathBuf {
        let project = self.project.borrow();
        let dir = project.as_ref().expect("project directory not created");
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir should be UTF-8")
    }

    fn create_project(&self, config: Option<&str>) {
        self.project
            .replace(Some(TempDir::new().expect("failed to create temp dir")));
        if let Some(contents) = config {
            std::fs::write(self.project_dir().join(CONFIG_FILE_NAME), contents)
                .expect("failed to write configuration");
        }
    }

    fn config(&self) -> ProjectConfig {
        let loaded = self.loaded.borrow();
        match loaded.as_ref().expect("configuration not loaded") {
            Ok(config) => config.clone(),
            Err(err) => panic!("configuration failed to load: {err}"),
        }
    }
}

#[fixture]
fn world() -> PlatformWorld {
    PlatformWorld::default()
}

#[given("the host reports OS type {os_type}")]
fn given_os_type(world: &PlatformWorld, os_type: String) {
    world.env.replace(Some(StubEnvironment::new(&os_type)));
}

#[given("a project directory without configuration")]
fn given_bare_project(world: &PlatformWorld) {
    world.create_project(None);
}

#[given("a project directory whose configuration sets the version-control tool to {tool}")]
fn given_vcs_override(world: &PlatformWorld, tool: String) {
    world.create_project(Some(&format!("[install]\nvcs_tool = \"{tool}\"\n")));
}

#[given("a project directory whose configuration contains an unknown table")]
fn given_unknown_table(world: &PlatformWorld) {
    world.create_project(Some("[publish]\nenabled = true\n"));
}

#[when("the platform is detected")]
fn when_platform_detected(world: &PlatformWorld) {
    let env = world.env.borrow();
    let family = OsFamily::detect(env.as_ref().expect("host not configured"));
    world.family.replace(Some(family));
}

#[when("the configuration is loaded")]
fn when_config_loaded(world: &PlatformWorld) {
    let result = ProjectConfig::load_from_dir(&world.project_dir());
    world.loaded.replace(Some(result));
}

#[then("the detected platform is {name}")]
fn then_platform_is(world: &PlatformWorld, name: String) {
    let family = world.family.borrow().expect("platform not detected");
    assert_eq!(family.as_str(), name);
}

#[then("the application is named {name}")]
fn then_app_named(world: &PlatformWorld, name: String) {
    assert_eq!(world.config().app.name, name);
}

#[then("the version-control tool is {tool}")]
fn then_vcs_tool(world: &PlatformWorld, tool: String) {
    assert_eq!(world.config().install.vcs_tool, tool);
}

#[then("loading fails naming {file}")]
fn then_loading_fails(world: &PlatformWorld, file: String) {
    let loaded = world.loaded.borrow();
    match loaded.as_ref().expect("configuration not loaded") {
        Ok(config) => panic!("expected a configuration error, got {config:?}"),
        Err(err) => assert!(err.to_string().contains(&file), "{err}"),
    }
}

#[scenario(path = "tests/features/platform.feature", index = 0)]
fn scenario_prefix_classification(world: PlatformWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/platform.feature", index = 1)]
fn scenario_unknown_os(world: PlatformWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/platform.feature", index = 2)]
fn scenario_missing_config(world: PlatformWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/platform.feature", index = 3)]
fn scenario_config_override(world: PlatformWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/platform.feature", index = 4)]
fn scenario_unknown_keys(world: PlatformWorld) {
    let _ = world;
}
