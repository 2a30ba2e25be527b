//! Lowering of every declaration kind except components and screens.

use super::{Linker, NodeRef, PendingEntity, props};
use crate::{
    error::{Error, StructuralError},
    model::RoleId,
    node::{
        Api, Attribute, Broker, BrokerKind, Database, DatabaseKind, Endpoint, HttpMethod, Query,
        QueryKind, RestApi, Role, SourceRef, Topic, User, Webpage, Websocket,
    },
};
use indexmap::IndexMap;
use webdsl_syntax::ast::{Decl, Ident};

/// Host used when a connection or server omits `host`.
pub(crate) const DEFAULT_HOST: &str = "localhost";

impl<'a> Linker<'a> {
    /// Parse the `<Variant>` of a `Broker`, `Database` or `Component`.
    pub(super) fn variant<T>(
        &self,
        decl: &Decl,
        parse: impl FnOnce(&str) -> Option<T>,
        allowed: &str,
    ) -> Result<T, StructuralError> {
        let Some(variant) = &decl.variant else {
            return Err(StructuralError::at(
                format!("{} '{}' is missing its kind", decl.kind, decl.name),
                self.location(decl.name.span),
            ));
        };

        parse(variant.as_str()).ok_or_else(|| self.unknown_variant(decl, allowed))
    }

    pub(super) fn unknown_variant(&self, decl: &Decl, allowed: &str) -> StructuralError {
        let (text, span) = decl
            .variant
            .as_ref()
            .map_or(("", decl.name.span), |v| (v.as_str(), v.span));

        StructuralError::at(
            format!("unknown {} kind '{text}' (expected {allowed})", decl.kind),
            self.location(span),
        )
    }

    pub(super) fn lower_broker(&self, decl: &'a Decl) -> Result<Broker, Error> {
        let kind = self.variant(decl, BrokerKind::parse, "AMQP, MQTT or Redis")?;
        let mut props = self.props(decl)?;

        let broker = Broker {
            name: decl.name.name.clone(),
            kind,
            host: props.string("host")?.unwrap_or_else(|| DEFAULT_HOST.into()),
            port: props.uint("port")?,
            username: props.string("username")?,
            password: props.string("password")?,
            vhost: props.string("vhost")?,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(broker)
    }

    pub(super) fn lower_database(&self, decl: &'a Decl) -> Result<Database, Error> {
        let kind = self.variant(decl, DatabaseKind::parse, "MongoDB or MySQL")?;
        let mut props = self.props(decl)?;

        let database = Database {
            name: decl.name.name.clone(),
            kind,
            host: props.string("host")?.unwrap_or_else(|| DEFAULT_HOST.into()),
            port: props.uint("port")?,
            database: props.string("database")?,
            username: props.string("username")?,
            password: props.string("password")?,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(database)
    }

    pub(super) fn lower_rest_api(&self, decl: &'a Decl) -> Result<RestApi, Error> {
        let mut props = self.props(decl)?;

        let rest_api = RestApi {
            name: decl.name.name.clone(),
            host: props.string("host")?.unwrap_or_else(|| DEFAULT_HOST.into()),
            port: props.uint("port")?,
            https: props.bool("https")?.unwrap_or_default(),
            base_path: props.string("basePath")?,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(rest_api)
    }

    pub(super) fn lower_topic(&self, decl: &'a Decl) -> Result<Topic, Error> {
        let mut props = self.props(decl)?;

        let connection = props
            .name("connection")?
            .ok_or_else(|| props.missing("connection", decl.name.span))?;
        let topic = props
            .string("topic")?
            .ok_or_else(|| props.missing("topic", decl.name.span))?;
        let allowed_roles = self.resolve_roles(props.names("allowedRoles")?)?;
        props.finish()?;

        Ok(Topic {
            name: decl.name.name.clone(),
            connection: self.namespace.broker(connection, self.sources)?,
            topic,
            allowed_roles,
            location: self.location(decl.name.span),
        })
    }

    pub(super) fn lower_endpoint(&self, decl: &'a Decl) -> Result<Endpoint, Error> {
        let mut props = self.props(decl)?;

        let connection = props
            .name("connection")?
            .ok_or_else(|| props.missing("connection", decl.name.span))?;
        let path = props
            .string("path")?
            .ok_or_else(|| props.missing("path", decl.name.span))?;
        let method = match props.word("method")? {
            Some((text, key)) => HttpMethod::parse(&text)
                .ok_or_else(|| props.invalid(key, &format!("unknown HTTP method '{text}'")))?,
            None => HttpMethod::default(),
        };

        let mut params = IndexMap::new();
        for (key, value) in props.map("params")?.unwrap_or_default() {
            let scalar = props::scalar(value).ok_or_else(|| {
                props.invalid(key, &format!("expects a literal value, found {}", value.describe()))
            })?;
            params.insert(key.name.clone(), scalar);
        }
        props.finish()?;

        Ok(Endpoint {
            name: decl.name.name.clone(),
            connection: self.namespace.rest_api(connection, self.sources)?,
            path,
            method,
            params,
            location: self.location(decl.name.span),
        })
    }

    pub(super) fn lower_query(&self, decl: &'a Decl) -> Result<Query, Error> {
        let mut props = self.props(decl)?;

        let connection = props
            .name("connection")?
            .ok_or_else(|| props.missing("connection", decl.name.span))?;
        let connection = self.namespace.database(connection, self.sources)?;

        let kind = match self.model.database(connection).kind {
            DatabaseKind::MySql => QueryKind::MySql {
                query: props
                    .string("query")?
                    .ok_or_else(|| props.missing("query", decl.name.span))?,
            },
            DatabaseKind::MongoDb => QueryKind::MongoDb {
                collection: props
                    .string("collection")?
                    .ok_or_else(|| props.missing("collection", decl.name.span))?,
                filter: props.string("filter")?,
            },
        };
        props.finish()?;

        Ok(Query {
            name: decl.name.name.clone(),
            connection,
            kind,
            location: self.location(decl.name.span),
        })
    }

    pub(super) fn lower_entity(&self, decl: &'a Decl) -> Result<PendingEntity, Error> {
        let mut props = self.props(decl)?;

        let source = match props.name("source")? {
            None => None,
            Some(name) if name.as_str() == "static" => Some(SourceRef::Static),
            Some(name) => Some(self.namespace.resolve(
                name,
                "entity source",
                self.sources,
                |node| match node {
                    NodeRef::Topic(id) => Some(SourceRef::BrokerTopic(id)),
                    NodeRef::Endpoint(id) => Some(SourceRef::RestEndpoint(id)),
                    NodeRef::Query(id) => Some(match self.model.query(id).kind {
                        QueryKind::MySql { .. } => SourceRef::MySqlQuery(id),
                        QueryKind::MongoDb { .. } => SourceRef::MongoDbQuery(id),
                    }),
                    _ => None,
                },
            )?),
        };

        let entity = PendingEntity {
            name: decl.name.name.clone(),
            description: props.string("description")?,
            attributes: self.attributes(decl)?,
            strict: props.bool("strict")?,
            interval: props.uint("interval")?,
            source,
            overloads: props.name("overloads")?.cloned(),
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(entity)
    }

    fn attributes(&self, decl: &Decl) -> Result<Option<Vec<Attribute>>, StructuralError> {
        let Some(declared) = &decl.body.attributes else {
            return Ok(None);
        };

        let mut attributes: Vec<Attribute> = Vec::with_capacity(declared.len());
        for attr in declared {
            if attributes.iter().any(|a| a.name == attr.name.name) {
                return Err(StructuralError::at(
                    format!(
                        "duplicate attribute '{}' on entity '{}'",
                        attr.name, decl.name
                    ),
                    self.location(attr.name.span),
                ));
            }
            attributes.push(Attribute {
                name: attr.name.name.clone(),
                ty: attr.ty.name.clone(),
            });
        }

        Ok(Some(attributes))
    }

    pub(super) fn lower_role(&self, decl: &'a Decl) -> Result<Role, Error> {
        let mut props = self.props(decl)?;

        let role = Role {
            name: decl.name.name.clone(),
            description: props.string("description")?,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(role)
    }

    pub(super) fn lower_user(&self, decl: &'a Decl) -> Result<User, Error> {
        let mut props = self.props(decl)?;

        let user = User {
            name: decl.name.name.clone(),
            roles: self.resolve_roles(props.names("roles")?)?,
            description: props.string("description")?,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(user)
    }

    pub(super) fn resolve_roles(
        &self,
        names: Option<Vec<&Ident>>,
    ) -> Result<Vec<RoleId>, Error> {
        self.resolve_names(names, |namespace, name, sources| namespace.role(name, sources))
    }

    pub(super) fn lower_webpage(&self, decl: &'a Decl) -> Result<Webpage, Error> {
        let mut props = self.props(decl)?;

        let screens = match props.names("screens")? {
            Some(names) => self.resolve_names(Some(names), |namespace, name, sources| {
                namespace.screen(name, sources)
            })?,
            None => self.all_screens(),
        };

        let webpage = Webpage {
            name: decl.name.name.clone(),
            title: props.string("title")?,
            description: props.string("description")?,
            navbar: props.bool("navbar")?.unwrap_or(true),
            screens,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(webpage)
    }

    pub(super) fn lower_api(&self, decl: &'a Decl) -> Result<Api, Error> {
        let mut props = self.props(decl)?;

        let api = Api {
            name: decl.name.name.clone(),
            host: props.string("host")?.unwrap_or_else(|| DEFAULT_HOST.into()),
            port: props.uint("port")?,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(api)
    }

    pub(super) fn lower_websocket(&self, decl: &'a Decl) -> Result<Websocket, Error> {
        let mut props = self.props(decl)?;

        let websocket = Websocket {
            name: decl.name.name.clone(),
            host: props.string("host")?.unwrap_or_else(|| DEFAULT_HOST.into()),
            port: props.uint("port")?,
            location: self.location(decl.name.span),
        };
        props.finish()?;

        Ok(websocket)
    }
}
