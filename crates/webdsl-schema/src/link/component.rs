//! Lowering of `Component<Kind>` declarations.
//!
//! Bound paths are compiled here, without an entity prefix, so they do not
//! depend on which entity ends up canonical after overload resolution.

use super::{Linker, props::Props};
use crate::{
    compile::compile_path,
    error::{Error, StructuralError},
    node::{
        Alive, AttributeView, Chart, CompiledPath, Component, ComponentKind, CrudTable, Form,
        FormElement, Gauge, Image, Input, Label, Notification, PieChart, ProgressBar, Publish,
        SourceOfContent, Table, Text,
    },
};
use webdsl_syntax::ast::{Decl, Value};

const KINDS: &str = "Alive, BarChart, CrudTable, Form, Gauge, Image, Input, JsonViewer, Label, \
                     LineChart, Logs, Notification, PieChart, ProgressBar, Publish, Table or Text";

impl<'a> Linker<'a> {
    pub(super) fn lower_component(&self, decl: &'a Decl) -> Result<Component, Error> {
        let kind_name = self.variant(decl, |text| Some(text.to_string()), KINDS)?;
        let mut props = self.props(decl)?;

        let entity = props
            .name("entity")?
            .map(|name| self.namespace.entity(name, self.sources))
            .transpose()?;

        let kind = match kind_name.as_str() {
            "Alive" => ComponentKind::Alive(Alive {
                timeout: props.uint("timeout")?.unwrap_or(Alive::DEFAULT_TIMEOUT),
                description: props.string("description")?,
            }),
            "BarChart" => ComponentKind::BarChart(chart(&mut props)?),
            "CrudTable" => ComponentKind::CrudTable(CrudTable {
                attributes: paths(&mut props, "attributes")?,
                primary_key: props.string("primaryKey")?,
                table: props.string("table")?,
            }),
            "Form" => ComponentKind::Form(self.form(&mut props)?),
            "Gauge" => ComponentKind::Gauge(Gauge {
                value: path(&mut props, "value")?,
                value_static: props.scalar("valueStatic")?,
                description: props.string("description")?,
            }),
            "Image" => ComponentKind::Image(Image {
                source: path(&mut props, "source")?,
                source_static: props.string("sourceStatic")?,
                width: props.uint("width")?.unwrap_or(Image::DEFAULT_SIZE),
                height: props.uint("height")?.unwrap_or(Image::DEFAULT_SIZE),
            }),
            "Input" => ComponentKind::Input(input(&mut props)?),
            "JsonViewer" => ComponentKind::JsonViewer(AttributeView {
                attributes: paths(&mut props, "attributes")?,
            }),
            "Label" => ComponentKind::Label(Label {
                content: props.string("content")?,
            }),
            "LineChart" => ComponentKind::LineChart(chart(&mut props)?),
            "Logs" => ComponentKind::Logs(AttributeView {
                attributes: paths(&mut props, "attributes")?,
            }),
            "Notification" => ComponentKind::Notification(Notification {
                level: props
                    .string("level")?
                    .unwrap_or_else(|| Notification::DEFAULT_LEVEL.into()),
                message: path(&mut props, "message")?,
            }),
            "PieChart" => ComponentKind::PieChart(PieChart {
                data_name: path(&mut props, "dataName")?,
                value: path(&mut props, "value")?,
                description: props.string("description")?,
            }),
            "ProgressBar" => ComponentKind::ProgressBar(ProgressBar {
                value: path(&mut props, "value")?,
                description: props.string("description")?,
            }),
            "Publish" => ComponentKind::Publish(Publish {
                broker: props
                    .name("broker")?
                    .map(|name| self.namespace.broker(name, self.sources))
                    .transpose()?,
                topic: props.string("topic")?,
                json: props.string("json")?,
                description: props.string("description")?,
            }),
            "Table" => ComponentKind::Table(Table {
                columns: paths(&mut props, "columns")?,
            }),
            "Text" => ComponentKind::Text(Text {
                content: path(&mut props, "content")?,
                content_static: props.string("contentStatic")?,
                size: props.uint("size")?,
                color: props
                    .string("color")?
                    .unwrap_or_else(|| Text::DEFAULT_COLOR.into()),
            }),
            _ => return Err(self.unknown_variant(decl, KINDS).into()),
        };
        props.finish()?;

        Ok(Component {
            name: decl.name.name.clone(),
            entity,
            kind,
            source_of_content: SourceOfContent::default(),
            location: self.location(decl.name.span),
        })
    }

    // form
    // `elements: [{ kind: input, ... }, { kind: label, ... }]`
    fn form(&self, props: &mut Props<'a>) -> Result<Form, Error> {
        let mut elements = Vec::new();

        for (index, item) in props.list("elements")?.unwrap_or_default().iter().enumerate() {
            let Value::Map { entries, .. } = item else {
                return Err(StructuralError::at(
                    format!(
                        "form element {index} expects a map, found {}",
                        item.describe()
                    ),
                    self.location(item.span()),
                )
                .into());
            };

            let mut fields = Props::from_map(format!("form element {index}"), entries, self.sources)?;
            let element = match fields.word("kind")? {
                Some((kind, _)) if kind == "input" => FormElement::Input(input(&mut fields)?),
                Some((kind, _)) if kind == "label" => FormElement::Label(Label {
                    content: fields.string("content")?,
                }),
                Some((kind, key)) => {
                    return Err(fields
                        .invalid(key, &format!("unknown form element kind '{kind}'"))
                        .into());
                }
                None => return Err(fields.missing("kind", item.span()).into()),
            };
            fields.finish()?;
            elements.push(element);
        }

        Ok(Form {
            elements,
            description: props.string("description")?,
        })
    }
}

fn input(props: &mut Props<'_>) -> Result<Input, StructuralError> {
    Ok(Input {
        input_type: props.string("type")?,
        placeholder: props.string("placeholder")?,
        required: props.bool("required")?.unwrap_or_default(),
        datakey: props.string("datakey")?,
    })
}

fn chart(props: &mut Props<'_>) -> Result<Chart, StructuralError> {
    Ok(Chart {
        x_label: props
            .string("xLabel")?
            .unwrap_or_else(|| Chart::DEFAULT_X_LABEL.into()),
        y_label: props
            .string("yLabel")?
            .unwrap_or_else(|| Chart::DEFAULT_Y_LABEL.into()),
        x_value: path(props, "xValue")?,
        y_values: paths(props, "yValues")?,
        description: props.string("description")?,
    })
}

fn path(props: &mut Props<'_>, key: &str) -> Result<Option<CompiledPath>, StructuralError> {
    Ok(props.path(key)?.map(compile_path))
}

fn paths(props: &mut Props<'_>, key: &str) -> Result<Vec<CompiledPath>, StructuralError> {
    Ok(props
        .paths(key)?
        .unwrap_or_default()
        .into_iter()
        .map(compile_path)
        .collect())
}
