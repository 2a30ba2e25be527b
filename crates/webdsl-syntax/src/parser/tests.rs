use super::*;
use crate::ast::{
    Accessor, CompareOp, DeclKind, Element, Literal, Operand, PrimaryExpr, Value,
};

const FILE: FileId = FileId::new(0);

fn parse(source: &str) -> File {
    parse_file(source, FILE).expect("source should parse")
}

fn parse_err(source: &str) -> ParseError {
    parse_file(source, FILE).expect_err("source should not parse")
}

#[test]
fn imports_precede_declarations() {
    let file = parse(
        r#"
        import "entities.wdsl"
        import "lib/screens.wdsl"

        Role Admin end
        "#,
    );

    let paths: Vec<_> = file.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, ["entities.wdsl", "lib/screens.wdsl"]);
    assert_eq!(file.decls.len(), 1);
    assert_eq!(file.decls[0].kind, DeclKind::Role);
}

#[test]
fn entity_with_attribute_list_and_properties() {
    let file = parse(
        r"
        Entity Temperature
            source: TempTopic
            strict: true
            interval: 0
            attributes:
                - temp: float
                - unit: str
        end
        ",
    );

    let decl = &file.decls[0];
    assert_eq!(decl.kind, DeclKind::Entity);
    assert_eq!(decl.name.as_str(), "Temperature");

    let keys: Vec<_> = decl.body.properties.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["source", "strict", "interval"]);

    let attrs = decl.body.attributes.as_ref().expect("attribute list");
    let names: Vec<_> = attrs
        .iter()
        .map(|a| (a.name.as_str(), a.ty.as_str()))
        .collect();
    assert_eq!(names, [("temp", "float"), ("unit", "str")]);
}

#[test]
fn variant_declarations_require_kind_brackets() {
    let file = parse(
        r#"
        Broker<MQTT> HomeBroker
            host: "localhost"
            port: 1883
        end
        Component<Gauge> TempGauge
            entity: Temperature
            value: this.temp
        end
        "#,
    );

    assert_eq!(
        file.decls[0].variant.as_ref().map(|v| v.as_str()),
        Some("MQTT")
    );
    assert_eq!(
        file.decls[1].variant.as_ref().map(|v| v.as_str()),
        Some("Gauge")
    );

    let err = parse_err("Broker HomeBroker end");
    assert!(err.message.contains("`<`"), "{}", err.message);
}

#[test]
fn values_cover_lists_maps_and_paths() {
    let file = parse(
        r#"
        Endpoint Weather
            connection: WeatherApi
            path: "/forecast"
            params: { city: "Athens", days: 3, metric: true }
            ratio: -0.5
        end
        Component<LineChart> Chart
            yValues: [this.a, data[1].b,]
        end
        "#,
    );

    let props = &file.decls[0].body.properties;
    let Value::Map { entries, .. } = &props[2].value else {
        panic!("expected map, got {:?}", props[2].value);
    };
    assert_eq!(entries.len(), 3);
    assert!(matches!(entries[2].1, Value::Bool { value: true, .. }));
    assert!(matches!(props[3].value, Value::Float { value, .. } if (value + 0.5).abs() < f64::EPSILON));

    let Value::List { items, .. } = &file.decls[1].body.properties[0].value else {
        panic!("expected list");
    };
    assert_eq!(items.len(), 2);
    let Value::Path(path) = &items[1] else {
        panic!("expected path");
    };
    assert_eq!(path.base.as_str(), "data");
    assert!(matches!(path.accessors[0], Accessor::Index { index: 1, .. }));
    assert!(matches!(&path.accessors[1], Accessor::Attribute(name) if name.as_str() == "b"));
}

#[test]
fn screen_elements_nest() {
    let file = parse(
        r#"
        Screen Home
            url: "/"
            TempGauge
            Row
                Column
                    Component<Text> Title
                        contentStatic: "hello"
                    end
                end
                OtherGauge
            end
        end
        "#,
    );

    let body = &file.decls[0].body;
    assert_eq!(body.properties.len(), 1);
    assert_eq!(body.elements.len(), 2);
    assert!(matches!(&body.elements[0], Element::Reference(name) if name.as_str() == "TempGauge"));

    let Element::Row { children, .. } = &body.elements[1] else {
        panic!("expected row");
    };
    let Element::Column { children: inner, .. } = &children[0] else {
        panic!("expected column");
    };
    assert!(matches!(&inner[0], Element::Component(decl) if decl.name.as_str() == "Title"));
    assert!(matches!(&children[1], Element::Reference(_)));
}

#[test]
fn condition_element() {
    let file = parse(
        r"
        Screen S
            Condition
                if: a.x > 5 and b.y == 2
                then: Hot
                else: [Cold, Warm]
            end
        end
        ",
    );

    let Element::Condition(cond) = &file.decls[0].body.elements[0] else {
        panic!("expected condition");
    };
    assert_eq!(cond.then.as_str(), "Hot");
    assert_eq!(cond.otherwise.len(), 2);
    assert!(cond.expr.right.is_none());
    assert!(cond.expr.left.right.is_some());
}

#[test]
fn condition_requires_if_and_then() {
    let err = parse_err("Screen S Condition then: A end end");
    assert!(err.message.contains("`if`"), "{}", err.message);

    let err = parse_err("Screen S Condition if: a.x > 1 if: a.x > 2 then: A end end");
    assert!(err.message.contains("duplicate"), "{}", err.message);
}

#[test]
fn repetition_element() {
    let file = parse(
        r"
        Screen S
            Repetition
                item: row
                data: Sensors.rows
                dataElse: Sensors.fallback
                condition: > 10
                component: RowView
                else: Empty
                orientation: horizontal
            end
        end
        ",
    );

    let Element::Repetition(rep) = &file.decls[0].body.elements[0] else {
        panic!("expected repetition");
    };
    assert_eq!(rep.item.base.as_str(), "row");
    assert_eq!(rep.data.as_ref().map(|d| d.accessors.len()), Some(1));
    let half = rep.condition.as_ref().expect("condition");
    assert_eq!(half.op, CompareOp::Gt);
    assert!(matches!(
        half.right,
        Operand::Literal {
            value: Literal::Int(10),
            ..
        }
    ));
    assert_eq!(rep.orientation.as_ref().map(|o| o.as_str()), Some("horizontal"));
}

#[test]
fn repetition_rejects_unknown_key() {
    let err = parse_err("Screen S Repetition item: x component: C colour: red end end");
    assert!(err.message.contains("colour"), "{}", err.message);
}

#[test]
fn and_or_are_right_recursive() {
    let expr = parse_condition("a.x == 1 or b.y == 2 or c.z == 3", FILE).expect("condition");

    let second = expr.right.as_ref().expect("first or");
    let third = second.right.as_ref().expect("second or");
    assert!(third.right.is_none());
}

#[test]
fn parentheses_group() {
    let expr = parse_condition("(a.x == 1 or a.y == 2) and a.z != \"off\"", FILE)
        .expect("condition");

    assert!(expr.right.is_none());
    assert!(matches!(expr.left.left, PrimaryExpr::Group(_)));
    let and = expr.left.right.as_ref().expect("and");
    let PrimaryExpr::Comparison(cmp) = &and.left else {
        panic!("expected comparison");
    };
    assert_eq!(cmp.op, CompareOp::Ne);
    assert!(matches!(
        &cmp.right,
        Operand::Literal { value: Literal::Str(s), .. } if s == "off"
    ));
}

#[test]
fn condition_rejects_trailing_tokens() {
    let err = parse_condition("a.x == 1 b", FILE).expect_err("trailing identifier");
    assert!(err.message.contains("end of condition"), "{}", err.message);
}

#[test]
fn missing_end_reports_end_of_file() {
    let err = parse_err("Entity A\n strict: true\n");
    assert!(err.message.contains("end of file"), "{}", err.message);
    assert_eq!(err.span.start, err.span.end);
}

#[test]
fn keywords_are_accepted_as_property_keys() {
    let file = parse("Component<Publish> P\n Broker: B\n topic: \"t\"\nend");

    assert_eq!(file.decls[0].body.properties[0].key.as_str(), "Broker");
}

#[test]
fn reserved_words_name_attributes_and_accessors() {
    let file = parse("Entity Switch\n attributes:\n  - end: str\n  - true: bool\nend");

    let attrs = file.decls[0].body.attributes.as_ref().expect("attribute list");
    let names: Vec<_> = attrs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["end", "true"]);

    let expr = parse_condition("Switch.end == 1 and Switch.or.import != false", FILE)
        .expect("condition should parse");
    let PrimaryExpr::Comparison(first) = &expr.left.left else {
        panic!("expected comparison");
    };
    let Operand::Path(path) = &first.left else {
        panic!("expected path operand");
    };
    assert!(matches!(&path.accessors[..], [Accessor::Attribute(name)] if name.as_str() == "end"));

    let rest = expr.left.right.as_ref().expect("and branch");
    let PrimaryExpr::Comparison(second) = &rest.left else {
        panic!("expected comparison");
    };
    let Operand::Path(path) = &second.left else {
        panic!("expected path operand");
    };
    assert_eq!(path.accessors.len(), 2);
    assert!(matches!(second.right, Operand::Literal { value: Literal::Bool(false), .. }));
}
