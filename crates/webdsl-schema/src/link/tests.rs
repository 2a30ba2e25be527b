use super::*;
use crate::{
    error::ErrorKind,
    load::{MemoryLoader, load_repository},
    node::{ComponentKind, HttpMethod, QueryKind, Scalar, ScreenElement},
};
use std::path::Path;
use webdsl_config::ImportConfig;

const WEBPAGE: &str = "Webpage App\nend\n";

fn link_files(files: &[(&str, &str)]) -> Result<Linked, Error> {
    let loader = files
        .iter()
        .fold(MemoryLoader::new(), |loader, (path, text)| {
            loader.with_file(path, *text)
        });
    let repo = load_repository(Path::new(files[0].0), &loader, &ImportConfig::default())?;

    link(&repo)
}

fn link_one(text: &str) -> Result<Linked, Error> {
    let text = format!("{WEBPAGE}{text}");

    link_files(&[("root.wdsl", text.as_str())])
}

#[test]
fn forward_and_cross_file_references_resolve() {
    let linked = link_files(&[
        (
            "root.wdsl",
            "import \"data.wdsl\"\nWebpage App\nend\nComponent<Gauge> G\n entity: Temp\n value: Temp.value\nend\n",
        ),
        ("data.wdsl", "Entity Temp\n source: static\nend\n"),
    ])
    .unwrap();

    let component = &linked.model.components[0];
    assert_eq!(component.entity, Some(EntityId::new(0)));
    let ComponentKind::Gauge(gauge) = &component.kind else {
        panic!("expected a gauge");
    };
    assert_eq!(gauge.value.as_ref().map(|p| p.tokens.len()), Some(1));
    assert_eq!(linked.entities[0].source, Some(SourceRef::Static));
}

#[test]
fn unresolved_reference_fails_fast_with_location() {
    let err = link_one("Component<Gauge> G\n entity: Missing\nend\n").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Reference);
    assert_eq!(err.location().map(|l| l.line), Some(4));
    assert!(err.to_string().contains("unresolved entity reference 'Missing'"));
}

#[test]
fn wrong_kind_reference_names_expected_kind() {
    let err = link_one("Role Admin\nend\nComponent<Gauge> G\n entity: Admin\nend\n").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Reference);
    assert!(err.to_string().contains("resolves to role, expected entity"));
}

#[test]
fn duplicate_names_across_files_are_structural() {
    let err = link_files(&[
        ("root.wdsl", "import \"b.wdsl\"\nWebpage App\nend\nEntity Temp\nend\n"),
        ("b.wdsl", "Entity Temp\nend\n"),
    ])
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("duplicate declaration 'Temp'"));
}

#[test]
fn webpage_is_required_once_in_root() {
    let missing = link_files(&[("root.wdsl", "Entity Temp\nend\n")]).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Structural);

    let imported = link_files(&[
        ("root.wdsl", "import \"b.wdsl\"\n"),
        ("b.wdsl", WEBPAGE),
    ])
    .unwrap_err();
    assert!(imported.to_string().contains("must be declared in the root file"));

    let twice = link_one("Webpage Other\nend\n").unwrap_err();
    assert!(twice.to_string().contains("declared more than once"));
}

#[test]
fn api_and_websocket_are_singletons() {
    let linked = link_one("API Backend\n port: 8080\nend\nWebsocket Push\nend\n").unwrap();
    assert_eq!(linked.model.api.as_ref().map(|a| a.port), Some(Some(8080)));
    assert_eq!(
        linked.model.websocket.as_ref().map(|w| w.host.as_str()),
        Some("localhost")
    );

    let err = link_one("API A\nend\nAPI B\nend\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn query_variant_follows_database_kind() {
    let linked = link_one(concat!(
        "Database<MySQL> Sql\nend\n",
        "Database<MongoDB> Mongo\nend\n",
        "Query Rows\n connection: Sql\n query: \"SELECT * FROM t\"\nend\n",
        "Query Docs\n connection: Mongo\n collection: \"docs\"\nend\n",
        "Entity A\n source: Rows\nend\n",
        "Entity B\n source: Docs\nend\n",
    ))
    .unwrap();

    assert!(matches!(linked.model.queries[0].kind, QueryKind::MySql { .. }));
    assert!(matches!(
        linked.model.queries[1].kind,
        QueryKind::MongoDb { filter: None, .. }
    ));
    assert_eq!(
        linked.entities[0].source,
        Some(SourceRef::MySqlQuery(QueryId::new(0)))
    );
    assert_eq!(
        linked.entities[1].source,
        Some(SourceRef::MongoDbQuery(QueryId::new(1)))
    );
}

#[test]
fn mysql_query_requires_query_text() {
    let err = link_one("Database<MySQL> Sql\nend\nQuery Q\n connection: Sql\n collection: \"x\"\nend\n")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("missing required property 'query'"));
}

#[test]
fn endpoint_defaults_and_params() {
    let linked = link_one(concat!(
        "RESTApi Weather\n host: \"api.example.com\"\n https: true\nend\n",
        "Endpoint Current\n connection: Weather\n path: \"/now\"\n params: { city: \"Athens\", days: 3 }\nend\n",
        "Endpoint Post\n connection: Weather\n path: \"/p\"\n method: post\nend\n",
    ))
    .unwrap();

    let current = &linked.model.endpoints[0];
    assert_eq!(current.method, HttpMethod::Get);
    assert_eq!(current.params.get("city"), Some(&Scalar::Text("Athens".into())));
    assert_eq!(current.params.get("days"), Some(&Scalar::Int(3)));
    assert_eq!(linked.model.endpoints[1].method, HttpMethod::Post);
}

#[test]
fn entity_source_must_be_a_source() {
    let err = link_one("Role R\nend\nEntity E\n source: R\nend\n").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Reference);
    assert!(err.to_string().contains("expected entity source"));
}

#[test]
fn entity_keeps_unset_fields_open() {
    let linked = link_one(concat!(
        "Entity A\n strict: true\n attributes:\n  - x: int\n  - y: float\nend\n",
        "Entity B\n overloads: A\nend\n",
    ))
    .unwrap();

    let a = &linked.entities[0];
    assert_eq!(a.strict, Some(true));
    assert_eq!(a.attributes.as_ref().map(Vec::len), Some(2));

    let b = &linked.entities[1];
    assert!(b.attributes.is_none() && b.source.is_none() && b.interval.is_none());
    assert_eq!(b.overloads.as_ref().map(Ident::as_str), Some("A"));
}

#[test]
fn duplicate_attribute_is_structural() {
    let err = link_one("Entity A\n attributes:\n  - x: int\n  - x: str\nend\n").unwrap_err();

    assert!(err.to_string().contains("duplicate attribute 'x' on entity 'A'"));
}

#[test]
fn unknown_property_and_component_kind() {
    let err = link_one("Component<Gauge> G\n valeu: this.x\nend\n").unwrap_err();
    assert!(err.to_string().contains("unknown property 'valeu' on component 'G'"));

    let err = link_one("Component<Slider> S\nend\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("unknown component kind 'Slider'"));
}

#[test]
fn binding_expects_an_access_path() {
    let err = link_one("Component<Gauge> G\n value: \"temp\"\nend\n").unwrap_err();

    assert_eq!(
        err.to_string(),
        "root.wdsl:4:9: property 'value' of component 'G' expects an access path, found string"
    );
}

#[test]
fn elements_outside_screens_are_structural() {
    let err = link_one("Entity A\n Stray\nend\n").unwrap_err();

    assert!(err.to_string().contains("cannot contain screen elements"));
}

#[test]
fn screens_lower_inline_components_and_layout() {
    let linked = link_one(concat!(
        "Entity Temp\n attributes:\n  - value: float\nend\n",
        "Component<Text> Title\n contentStatic: \"Hi\"\nend\n",
        "Screen Home\n url: \"/home\"\n",
        " Title\n",
        " Row\n  Component<Gauge> Dial\n   entity: Temp\n   value: Temp.value\n  end\n end\n",
        " Condition if: Temp.value > 30 then: Dial else: Title end\n",
        " Repetition item: Temp.value component: Dial orientation: horizontal end\n",
        "end\n",
        "Component<Label> Footer\nend\n",
    ))
    .unwrap();

    // inline components take their handle in source order
    let names: Vec<_> = linked.model.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Title", "Dial", "Footer"]);

    let screen = &linked.model.screens[0];
    assert_eq!(screen.url, "/home");
    assert!(matches!(
        screen.elements.as_slice(),
        [
            ScreenElement::Component(_),
            ScreenElement::Row(_),
            ScreenElement::Condition(_),
            ScreenElement::Repetition(_),
        ]
    ));

    assert_eq!(linked.conditions[0].then, ComponentId::new(1));
    assert_eq!(linked.conditions[0].otherwise, [ComponentId::new(0)]);
    assert_eq!(linked.repetitions[0].orientation, Orientation::Horizontal);
    assert_eq!(linked.repetitions[0].item.entity, EntityId::new(0));
}

#[test]
fn condition_paths_must_start_at_an_entity() {
    let err = link_one(concat!(
        "Component<Label> L\nend\n",
        "Screen S\n Condition if: L.x == 1 then: L end\nend\n",
    ))
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Reference);
    assert!(err.to_string().contains("resolves to component, expected entity"));
}

#[test]
fn webpage_defaults_to_every_screen() {
    let linked = link_one("Screen A\nend\nScreen B\n url: \"/b\"\nend\n").unwrap();
    let webpage = linked.model.webpage.as_ref().unwrap();

    assert!(webpage.navbar);
    assert_eq!(webpage.screens, [ScreenId::new(0), ScreenId::new(1)]);
    assert_eq!(linked.model.screens[0].url, "/");
}

#[test]
fn form_elements_are_typed_maps() {
    let linked = link_one(concat!(
        "Component<Form> Signup\n elements: [\n",
        "  { kind: label, content: \"Name\" },\n",
        "  { kind: input, type: \"text\", required: true }\n ]\nend\n",
    ))
    .unwrap();

    let ComponentKind::Form(form) = &linked.model.components[0].kind else {
        panic!("expected a form");
    };
    assert_eq!(form.elements.len(), 2);

    let err = link_one("Component<Form> F\n elements: [{ kind: slider }]\nend\n").unwrap_err();
    assert!(err.to_string().contains("unknown form element kind 'slider'"));
}
