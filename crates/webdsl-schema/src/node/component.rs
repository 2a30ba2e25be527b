use crate::{
    model::{BrokerId, EntityId},
    node::{CompiledPath, Scalar, SourceOfContent},
};
use serde::Serialize;
use webdsl_syntax::Location;

///
/// Component
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    pub entity: Option<EntityId>,

    #[serde(flatten)]
    pub kind: ComponentKind,

    /// Derived from the bound entity's source once overloads are resolved.
    pub source_of_content: SourceOfContent,

    #[serde(skip)]
    pub location: Location,
}

///
/// Binding
/// One entity-bound path field of a component.
///

#[derive(Clone, Copy, Debug)]
pub struct Binding<'a> {
    pub field: &'static str,
    pub path: &'a CompiledPath,
}

///
/// BindPaths
///
/// Implemented by every component kind to list its entity-bound path fields,
/// sequences included. Kinds without bindings return nothing.
///

pub trait BindPaths {
    fn bindings(&self) -> Vec<Binding<'_>>;
}

fn one<'a>(out: &mut Vec<Binding<'a>>, field: &'static str, path: Option<&'a CompiledPath>) {
    if let Some(path) = path {
        out.push(Binding { field, path });
    }
}

fn many<'a>(out: &mut Vec<Binding<'a>>, field: &'static str, paths: &'a [CompiledPath]) {
    out.extend(paths.iter().map(|path| Binding { field, path }));
}

///
/// ComponentKind
///

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
#[remain::sorted]
pub enum ComponentKind {
    Alive(Alive),
    BarChart(Chart),
    CrudTable(CrudTable),
    Form(Form),
    Gauge(Gauge),
    Image(Image),
    Input(Input),
    JsonViewer(AttributeView),
    Label(Label),
    LineChart(Chart),
    Logs(AttributeView),
    Notification(Notification),
    PieChart(PieChart),
    ProgressBar(ProgressBar),
    Publish(Publish),
    Table(Table),
    Text(Text),
}

impl ComponentKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Alive(_) => "Alive",
            Self::BarChart(_) => "BarChart",
            Self::CrudTable(_) => "CrudTable",
            Self::Form(_) => "Form",
            Self::Gauge(_) => "Gauge",
            Self::Image(_) => "Image",
            Self::Input(_) => "Input",
            Self::JsonViewer(_) => "JsonViewer",
            Self::Label(_) => "Label",
            Self::LineChart(_) => "LineChart",
            Self::Logs(_) => "Logs",
            Self::Notification(_) => "Notification",
            Self::PieChart(_) => "PieChart",
            Self::ProgressBar(_) => "ProgressBar",
            Self::Publish(_) => "Publish",
            Self::Table(_) => "Table",
            Self::Text(_) => "Text",
        }
    }
}

impl BindPaths for ComponentKind {
    fn bindings(&self) -> Vec<Binding<'_>> {
        match self {
            Self::BarChart(kind) | Self::LineChart(kind) => kind.bindings(),
            Self::CrudTable(kind) => kind.bindings(),
            Self::Gauge(kind) => kind.bindings(),
            Self::Image(kind) => kind.bindings(),
            Self::JsonViewer(kind) | Self::Logs(kind) => kind.bindings(),
            Self::Notification(kind) => kind.bindings(),
            Self::PieChart(kind) => kind.bindings(),
            Self::ProgressBar(kind) => kind.bindings(),
            Self::Table(kind) => kind.bindings(),
            Self::Text(kind) => kind.bindings(),
            Self::Alive(_) | Self::Form(_) | Self::Input(_) | Self::Label(_) | Self::Publish(_) => {
                Vec::new()
            }
        }
    }
}

///
/// Alive
/// Heartbeat indicator that turns stale after `timeout` milliseconds.
///

#[derive(Clone, Debug, Serialize)]
pub struct Alive {
    pub timeout: u64,
    pub description: Option<String>,
}

impl Alive {
    pub const DEFAULT_TIMEOUT: u64 = 5000;
}

///
/// Chart
/// Shared shape of line and bar charts.
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub x_label: String,
    pub y_label: String,
    pub x_value: Option<CompiledPath>,
    pub y_values: Vec<CompiledPath>,
    pub description: Option<String>,
}

impl Chart {
    pub const DEFAULT_X_LABEL: &'static str = "X-Axis";
    pub const DEFAULT_Y_LABEL: &'static str = "Y-Axis";
}

impl BindPaths for Chart {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        one(&mut out, "xValue", self.x_value.as_ref());
        many(&mut out, "yValues", &self.y_values);

        out
    }
}

///
/// CrudTable
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrudTable {
    pub attributes: Vec<CompiledPath>,
    pub primary_key: Option<String>,
    pub table: Option<String>,
}

impl BindPaths for CrudTable {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        many(&mut out, "attributes", &self.attributes);

        out
    }
}

///
/// Form
///

#[derive(Clone, Debug, Serialize)]
pub struct Form {
    pub elements: Vec<FormElement>,
    pub description: Option<String>,
}

///
/// FormElement
///

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormElement {
    Input(Input),
    Label(Label),
}

///
/// Gauge
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub value: Option<CompiledPath>,
    pub value_static: Option<Scalar>,
    pub description: Option<String>,
}

impl BindPaths for Gauge {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        one(&mut out, "value", self.value.as_ref());

        out
    }
}

///
/// Image
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub source: Option<CompiledPath>,
    pub source_static: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub const DEFAULT_SIZE: u32 = 300;
}

impl BindPaths for Image {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        one(&mut out, "source", self.source.as_ref());

        out
    }
}

///
/// Input
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub input_type: Option<String>,
    pub placeholder: Option<String>,
    pub required: bool,
    pub datakey: Option<String>,
}

///
/// AttributeView
/// Attribute list shown by `JsonViewer` and `Logs`.
///

#[derive(Clone, Debug, Serialize)]
pub struct AttributeView {
    pub attributes: Vec<CompiledPath>,
}

impl BindPaths for AttributeView {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        many(&mut out, "attributes", &self.attributes);

        out
    }
}

///
/// Label
///

#[derive(Clone, Debug, Serialize)]
pub struct Label {
    pub content: Option<String>,
}

///
/// Notification
///

#[derive(Clone, Debug, Serialize)]
pub struct Notification {
    pub level: String,
    pub message: Option<CompiledPath>,
}

impl Notification {
    pub const DEFAULT_LEVEL: &'static str = "info";
}

impl BindPaths for Notification {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        one(&mut out, "message", self.message.as_ref());

        out
    }
}

///
/// PieChart
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    pub data_name: Option<CompiledPath>,
    pub value: Option<CompiledPath>,
    pub description: Option<String>,
}

impl BindPaths for PieChart {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        one(&mut out, "dataName", self.data_name.as_ref());
        one(&mut out, "value", self.value.as_ref());

        out
    }
}

///
/// ProgressBar
///

#[derive(Clone, Debug, Serialize)]
pub struct ProgressBar {
    pub value: Option<CompiledPath>,
    pub description: Option<String>,
}

impl BindPaths for ProgressBar {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        one(&mut out, "value", self.value.as_ref());

        out
    }
}

///
/// Publish
/// Button that publishes `json` to a broker topic.
///

#[derive(Clone, Debug, Serialize)]
pub struct Publish {
    pub broker: Option<BrokerId>,
    pub topic: Option<String>,
    pub json: Option<String>,
    pub description: Option<String>,
}

///
/// Table
///

#[derive(Clone, Debug, Serialize)]
pub struct Table {
    pub columns: Vec<CompiledPath>,
}

impl BindPaths for Table {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        many(&mut out, "columns", &self.columns);

        out
    }
}

///
/// Text
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub content: Option<CompiledPath>,
    pub content_static: Option<String>,
    pub size: Option<u32>,
    pub color: String,
}

impl Text {
    pub const DEFAULT_COLOR: &'static str = "#fff";
}

impl BindPaths for Text {
    fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        one(&mut out, "content", self.content.as_ref());

        out
    }
}
