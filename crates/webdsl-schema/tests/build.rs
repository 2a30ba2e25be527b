mod common;

use common::{ROOT, WEBPAGE, build, build_files, json};
use serde_json::json;
use std::collections::BTreeSet;
use webdsl_config::BuildConfig;
use webdsl_schema::{
    ErrorKind,
    error::{Error, ViolationKind},
    node::{ComponentKind, ScreenElement, SourceOfContent},
};

const STRICT_ENTITY: &str = "\
Entity E
 strict: true
 attributes:
  - a: int
  - b: str
end
";

#[test]
fn strict_entity_accepts_declared_roots() {
    let model = build(&format!(
        "{STRICT_ENTITY}\
Component<Gauge> First
 entity: E
 value: this.a
end
Component<Table> Rows
 entity: E
 columns: [this.a, this.b[0].name]
end
Component<Text> Whole
 entity: E
 content: this
end
"
    ))
    .unwrap();

    assert_eq!(model.components().count(), 3);
}

#[test]
fn strict_entity_rejects_undeclared_root() {
    let err = build(&format!(
        "{STRICT_ENTITY}\
Component<Gauge> Bad
 entity: E
 value: this.c
end
"
    ))
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    let Error::Validation(violations) = &err else {
        panic!("expected validation error, got {err}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::StrictViolation);
    assert_eq!(
        violations[0].message,
        "Component 'Bad' field 'value' uses attribute 'c' not allowed by strict entity 'E'"
    );
    assert_eq!(violations[0].location.as_ref().map(|l| l.line), Some(10));
}

#[test]
fn table_violation_names_the_offending_column_field() {
    let err = build(&format!(
        "{STRICT_ENTITY}\
Component<Table> Rows
 entity: E
 columns: [this.a, this.z]
end
"
    ))
    .unwrap_err();

    let Error::Validation(violations) = &err else {
        panic!("expected validation error, got {err}");
    };
    assert_eq!(violations.len(), 1);
    assert!(
        violations[0]
            .message
            .starts_with("Component 'Rows' field 'columns' uses attribute 'z'")
    );
}

#[test]
fn reserved_words_work_as_strict_attributes() {
    let model = build(
        "\
Entity Switch
 strict: true
 attributes:
  - end: str
  - or: bool
end
Component<Gauge> G
 entity: Switch
 value: this.end
end
Component<Label> L
end
Screen Main
 Condition if: Switch.or == true then: L end
end
",
    )
    .unwrap();

    let (_, gauge) = model.model().component_by_name("G").unwrap();
    let ComponentKind::Gauge(g) = &gauge.kind else {
        panic!("expected gauge");
    };
    assert_eq!(json(&g.value), json!(["end"]));

    let (_, condition) = model.model().conditions().next().unwrap();
    assert_eq!(json(&condition.compiled), json!([["Switch", "or"], "==", "true"]));
}

#[test]
fn validation_reports_every_violation_at_once() {
    let err = build(&format!(
        "{STRICT_ENTITY}\
Database<MySQL> Sql
end
Query AllRows
 connection: Sql
 query: \"SELECT * FROM readings\"
end
Entity Readings
 source: AllRows
end
Component<CrudTable> Editor
 entity: Readings
 attributes: [this.id]
end
Component<Gauge> One
 entity: E
 value: this.c
end
Component<LineChart> Two
 entity: E
 xValue: this.a
 yValues: [this.b, this.d]
end
"
    ))
    .unwrap_err();

    let Error::Validation(violations) = err else {
        panic!("expected validation error");
    };
    let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        [
            ViolationKind::StrictViolation,
            ViolationKind::StrictViolation,
            ViolationKind::CrudTable,
        ]
    );
    assert!(violations[1].message.contains("attribute 'd'"));
    assert!(violations[2].message.contains("'Editor'"));
}

#[test]
fn crud_table_with_table_name_passes() {
    let model = build(
        "\
Database<MySQL> Sql
end
Query AllRows
 connection: Sql
 query: \"SELECT * FROM readings\"
end
Entity Readings
 source: AllRows
end
Component<CrudTable> Editor
 entity: Readings
 table: \"readings\"
 primaryKey: \"id\"
end
",
    )
    .unwrap();

    let (_, editor) = model.model().component_by_name("Editor").unwrap();
    assert_eq!(editor.source_of_content, SourceOfContent::Db);
}

#[test]
fn component_paths_compile_to_token_arrays() {
    let model = build(
        "\
Entity Data
end
Component<Gauge> G
 entity: Data
 value: data[2].value
end
Component<LineChart> Chart
 entity: Data
 xValue: this.time
 yValues: [this.temp, this.readings[0]]
end
",
    )
    .unwrap();

    let (_, gauge) = model.model().component_by_name("G").unwrap();
    let ComponentKind::Gauge(kind) = &gauge.kind else {
        panic!("expected gauge");
    };
    assert_eq!(json(&kind.value), json!([2, "value"]));

    let (_, chart) = model.model().component_by_name("Chart").unwrap();
    assert_eq!(
        json(chart),
        json!({
            "name": "Chart",
            "entity": 0,
            "type": "LineChart",
            "xLabel": "X-Axis",
            "yLabel": "Y-Axis",
            "xValue": ["time"],
            "yValues": [["temp"], ["readings", 0]],
            "description": null,
            "sourceOfContent": "static",
        })
    );
}

#[test]
fn condition_compiles_to_prefix_arrays() {
    let model = build(
        "\
Entity a
end
Entity b
end
Component<Label> Hot
end
Component<Label> Cold
end
Screen Home
 Condition
  if: a.x > 5 and b.y == 2
  then: Hot
  else: Cold
 end
end
",
    )
    .unwrap();

    let (a, _) = model.model().entity_by_name("a").unwrap();
    let (b, _) = model.model().entity_by_name("b").unwrap();
    let (_, condition) = model.model().conditions().next().unwrap();

    assert_eq!(
        json(&condition.compiled),
        json!(["and", [["a", "x"], ">", 5], [["b", "y"], "==", 2]])
    );
    assert_eq!(condition.referenced_entities, BTreeSet::from([a, b]));
}

#[test]
fn literals_compile_as_written_except_booleans() {
    let model = build(
        "\
Entity Sensor
end
Component<Label> On
end
Screen Home
 Condition if: Sensor.count == 5 or Sensor.enabled == true then: On end
end
",
    )
    .unwrap();

    let (_, condition) = model.model().conditions().next().unwrap();
    assert_eq!(
        json(&condition.compiled),
        json!([
            "or",
            [["Sensor", "count"], "==", 5],
            [["Sensor", "enabled"], "==", "true"]
        ])
    );
}

#[test]
fn repetition_filter_serialises_with_empty_left_operand() {
    let model = build(
        "\
Entity Sensors
 attributes:
  - rows: list
end
Component<Label> RowView
end
Component<Label> Empty
end
Screen Home
 Repetition
  item: Sensors.rows
  data: Sensors.rows[0]
  condition: > 10
  component: RowView
  else: Empty
  orientation: horizontal
 end
end
",
    )
    .unwrap();

    let (_, repetition) = model.model().repetitions().next().unwrap();
    let value = json(repetition);

    assert_eq!(value["item"], json!(["Sensors", "rows"]));
    assert_eq!(value["data"], json!(["Sensors", "rows", 0]));
    assert_eq!(value["condition"], json!(["", ">", 10]));
    assert_eq!(value["orientation"], json!("horizontal"));
    assert_eq!(value["referencedEntities"], json!([0]));
}

#[test]
fn strict_checks_cover_condition_and_repetition_paths() {
    let err = build(&format!(
        "{STRICT_ENTITY}\
Component<Label> L
end
Screen Home
 Condition if: E.a > 1 and E.z == 2 then: L end
 Repetition item: E.b component: L data: E.w end
end
"
    ))
    .unwrap_err();

    let Error::Validation(violations) = err else {
        panic!("expected validation error");
    };
    let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "Condition uses attribute 'z' not allowed by strict entity 'E'",
            "Repetition uses attribute 'w' not allowed by strict entity 'E'",
        ]
    );
}

#[test]
fn imported_files_join_one_repository() {
    let root = format!("import \"entities.wdsl\"\n{WEBPAGE}Entity Local\nend\n");
    let model = build_files(
        &[
            (ROOT, root.as_str()),
            ("app/entities.wdsl", "Entity Remote\nend\n"),
        ],
        BuildConfig::default(),
    )
    .unwrap();

    assert_eq!(model.aggregated().entities.len(), 2);
    let names: Vec<_> = model.entities().map(|(_, e)| e.name.as_str()).collect();
    assert_eq!(names, ["Local", "Remote"]);
}

#[test]
fn webpage_in_imported_file_is_structural() {
    let root = format!("import \"entities.wdsl\"\n{WEBPAGE}Entity Local\nend\n");
    let err = build_files(
        &[
            (ROOT, root.as_str()),
            ("app/entities.wdsl", "Entity Remote\nend\nWebpage Second\nend\n"),
        ],
        BuildConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.location().map(|l| l.line), Some(3));
}

#[test]
fn missing_import_is_a_load_error() {
    let root = format!("import \"nope.wdsl\"\n{WEBPAGE}");
    let err = build_files(
        &[(ROOT, root.as_str())],
        BuildConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Load);
    assert!(err.to_string().contains("cannot resolve import \"nope.wdsl\""));
}

#[test]
fn syntax_errors_carry_locations() {
    let err = build("Entity Broken\n strict: \nend\n").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.location().map(|l| l.line), Some(6));
}

#[test]
fn builds_are_idempotent() {
    let files = [
        (
            ROOT,
            concat!(
                "import \"data.wdsl\"\n",
                "Webpage App\n navbar: false\nend\n",
                "Component<Gauge> G\n entity: Temp\n value: this.value\nend\n",
                "Screen Home\n G\n Row\n  Component<Text> T\n   entity: Temp\n   content: this.unit\n  end\n end\n",
                " Condition if: Temp.value >= 30.5 then: G else: T end\nend\n",
            ),
        ),
        (
            "app/data.wdsl",
            concat!(
                "Broker<MQTT> Mqtt\n port: 1883\nend\n",
                "Topic TempTopic\n connection: Mqtt\n topic: \"sensors/temp\"\nend\n",
                "Entity Temp\n source: TempTopic\n attributes:\n  - value: float\n  - unit: str\nend\n",
            ),
        ),
    ];

    let first = build_files(&files, BuildConfig::default()).unwrap();
    let second = build_files(&files, BuildConfig::default()).unwrap();

    assert_eq!(json(&first), json(&second));
    assert_eq!(first.aggregated(), second.aggregated());

    let failing = [(ROOT, "Webpage App\nend\nComponent<Gauge> G\n entity: Nope\nend\n")];
    let a = build_files(&failing, BuildConfig::default()).unwrap_err();
    let b = build_files(&failing, BuildConfig::default()).unwrap_err();
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn screen_entities_collect_every_binding() {
    let model = build(
        "\
Entity Bound
end
Entity Inline
end
Entity Tested
end
Entity Listed
end
Entity Unused
end
Component<Gauge> G
 entity: Bound
end
Component<Label> L
end
Screen Home
 G
 Column
  Component<Text> T
   entity: Inline
  end
 end
 Condition if: Tested.on == true then: L end
 Repetition item: Listed.rows component: L end
end
",
    )
    .unwrap();

    let (home, _) = model.model().screen_by_name("Home").unwrap();
    let names: Vec<_> = model
        .screen_entities(home)
        .into_iter()
        .map(|id| model.model().entity(id).name.as_str())
        .collect();

    assert_eq!(names, ["Bound", "Inline", "Tested", "Listed"]);
}

#[test]
fn topic_configs_are_unique_per_topic_and_broker() {
    let model = build(
        "\
Role Viewer
end
Broker<MQTT> Home
end
Broker<AMQP> Cloud
end
Topic Temp
 connection: Home
 topic: \"sensors/temp\"
 allowedRoles: [Viewer]
end
Topic TempAgain
 connection: Home
 topic: \"sensors/temp\"
end
Topic CloudTemp
 connection: Cloud
 topic: \"sensors/temp\"
end
Entity Reading
 source: Temp
 strict: true
 attributes:
  - value: float
end
Entity Duplicate
 source: TempAgain
end
Entity Remote
 source: CloudTemp
end
Entity Fixed
 source: static
end
",
    )
    .unwrap();

    assert_eq!(
        json(&model.topic_configs()),
        json!([
            {
                "entity": "Reading",
                "topic": "sensors/temp",
                "broker": "Home",
                "attributes": ["value"],
                "strict": true,
                "allowedRoles": ["Viewer"],
            },
            {
                "entity": "Remote",
                "topic": "sensors/temp",
                "broker": "Cloud",
                "attributes": [],
                "strict": false,
                "allowedRoles": [],
            },
        ])
    );
}

#[test]
fn singletons_and_screen_layout_serialise() {
    let model = build(
        "\
API Backend
 port: 8080
end
Component<Label> Title
 content: \"Hello\"
end
Screen Home
 url: \"/home\"
 Row
  Title
 end
end
",
    )
    .unwrap();

    assert_eq!(model.api().map(|api| api.port), Some(Some(8080)));
    assert!(model.websocket().is_none());

    let webpage = model.webpage().unwrap();
    assert_eq!(webpage.title.as_deref(), Some("Test"));

    let (_, home) = model.screens().next().unwrap();
    assert!(matches!(&home.elements[0], ScreenElement::Row(children) if children.len() == 1));
    assert_eq!(
        json(&home.elements),
        json!([{ "kind": "Row", "value": [{ "kind": "Component", "value": 0 }] }])
    );
}
