use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::tempdir;
use webdsl::{Error, build_model, schema::ErrorKind};

// write
// create `path` under `dir` along with any missing parents
fn write(dir: &Path, path: &str, text: &str) -> PathBuf {
    let path = dir.join(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();

    path
}

const ROOT: &str = "\
import \"lib/entities.wdsl\"

Webpage Dashboard
 title: \"Home\"
end

Entity Temp
 overloads: BaseTemp
end

Component<Gauge> TempGauge
 entity: Temp
 value: this.value
end

Screen Home
 TempGauge
end
";

const ENTITIES: &str = "\
Broker<MQTT> Mqtt
 port: 1883
end

Topic TempTopic
 connection: Mqtt
 topic: \"sensors/temp\"
end

Entity BaseTemp
 source: TempTopic
 attributes:
  - value: float
end
";

#[test]
fn builds_from_the_filesystem() {
    let dir = tempdir().unwrap();
    let root = write(dir.path(), "app.wdsl", ROOT);
    write(dir.path(), "lib/entities.wdsl", ENTITIES);

    let model = build_model(&root).unwrap();

    let names: Vec<_> = model.entities().map(|(_, e)| e.name.as_str()).collect();
    assert_eq!(names, ["Temp"]);
    assert_eq!(model.topic_configs().len(), 1);
    assert_eq!(model.webpage().and_then(|w| w.title.as_deref()), Some("Home"));

    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(json["aggregated"]["entities"], serde_json::json!([0]));
}

#[test]
fn config_next_to_the_root_is_applied() {
    let dir = tempdir().unwrap();
    let root = write(dir.path(), "app.wdsl", ROOT);
    write(dir.path(), "lib/entities.wdsl", ENTITIES);
    write(dir.path(), "webdsl.toml", "[overload]\nretain_superseded = true\n");

    let model = build_model(&root).unwrap();

    let names: Vec<_> = model.entities().map(|(_, e)| e.name.as_str()).collect();
    assert_eq!(names, ["Temp", "BaseTemp"]);
}

#[test]
fn search_paths_resolve_imports() {
    let dir = tempdir().unwrap();
    let root = write(dir.path(), "app/app.wdsl", ROOT);
    write(dir.path(), "shared/lib/entities.wdsl", ENTITIES);

    let err = build_model(&root).unwrap_err();
    assert_eq!(err.build_kind(), Some(ErrorKind::Load));

    let shared = dir.path().join("shared");
    write(
        dir.path(),
        "app/webdsl.toml",
        &format!("[imports]\nsearch_paths = [{:?}]\n", shared.display().to_string()),
    );
    assert!(build_model(&root).is_ok());
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    let root = write(dir.path(), "app.wdsl", ROOT);
    write(dir.path(), "webdsl.toml", "[overload]\nretain = true\n");

    let err = build_model(&root).unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(err.build_kind(), None);
}

#[test]
fn missing_root_is_a_load_error() {
    let dir = tempdir().unwrap();

    let err = build_model(dir.path().join("nope.wdsl")).unwrap_err();

    assert_eq!(err.build_kind(), Some(ErrorKind::Load));
}
