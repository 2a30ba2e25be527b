use super::{ConditionDraft, Linker, RepetitionDraft};
use crate::{
    error::{Error, StructuralError},
    model::{ConditionId, RepetitionId},
    node::{Orientation, Screen, ScreenElement},
};
use webdsl_syntax::ast::{AccessPath, ConditionDecl, Decl, Element, RepetitionDecl};

/// Route of a screen that does not declare `url`.
pub(crate) const DEFAULT_SCREEN_URL: &str = "/";

impl<'a> Linker<'a> {
    pub(super) fn lower_screen(&mut self, decl: &'a Decl) -> Result<Screen, Error> {
        let mut props = self.props(decl)?;

        let url = props
            .string("url")?
            .unwrap_or_else(|| DEFAULT_SCREEN_URL.into());
        let title = props.string("title")?;
        let description = props.string("description")?;
        let allowed_roles = self.resolve_roles(props.names("allowedRoles")?)?;
        props.finish()?;

        Ok(Screen {
            name: decl.name.name.clone(),
            url,
            title,
            description,
            allowed_roles,
            elements: self.lower_elements(&decl.body.elements)?,
            location: self.location(decl.name.span),
        })
    }

    fn lower_elements(&mut self, elements: &'a [Element]) -> Result<Vec<ScreenElement>, Error> {
        elements
            .iter()
            .map(|element| self.lower_element(element))
            .collect()
    }

    fn lower_element(&mut self, element: &'a Element) -> Result<ScreenElement, Error> {
        let lowered = match element {
            Element::Reference(name) => {
                ScreenElement::Component(self.namespace.component(name, self.sources)?)
            }
            // registered ahead of time, lowered with the other components
            Element::Component(decl) => {
                ScreenElement::Component(self.namespace.component(&decl.name, self.sources)?)
            }
            Element::Row { children, .. } => ScreenElement::Row(self.lower_elements(children)?),
            Element::Column { children, .. } => {
                ScreenElement::Column(self.lower_elements(children)?)
            }
            Element::Condition(condition) => {
                let draft = self.condition_draft(condition)?;
                self.conditions.push(draft);
                ScreenElement::Condition(ConditionId::new(self.conditions.len() - 1))
            }
            Element::Repetition(repetition) => {
                let draft = self.repetition_draft(repetition)?;
                self.repetitions.push(draft);
                ScreenElement::Repetition(RepetitionId::new(self.repetitions.len() - 1))
            }
        };

        Ok(lowered)
    }

    fn condition_draft(&self, condition: &ConditionDecl) -> Result<ConditionDraft, Error> {
        let expr = condition
            .expr
            .clone()
            .try_map_paths(&mut |path| self.entity_path(path))?;

        Ok(ConditionDraft {
            expr,
            then: self.namespace.component(&condition.then, self.sources)?,
            otherwise: condition
                .otherwise
                .iter()
                .map(|name| self.namespace.component(name, self.sources))
                .collect::<Result<_, _>>()?,
            location: self.location(condition.span),
        })
    }

    fn repetition_draft(&self, repetition: &RepetitionDecl) -> Result<RepetitionDraft, Error> {
        let orientation = match &repetition.orientation {
            Some(word) => Orientation::parse(word.as_str()).ok_or_else(|| {
                StructuralError::at(
                    format!(
                        "unknown repetition orientation '{word}' (expected horizontal or vertical)"
                    ),
                    self.location(word.span),
                )
            })?,
            None => Orientation::default(),
        };

        let optional = |path: &Option<AccessPath>| {
            path.clone()
                .map(|path| self.entity_path(path))
                .transpose()
        };

        Ok(RepetitionDraft {
            item: self.entity_path(repetition.item.clone())?,
            data: optional(&repetition.data)?,
            data_else: optional(&repetition.data_else)?,
            condition: repetition
                .condition
                .clone()
                .map(|half| half.try_map_paths(&mut |path| self.entity_path(path)))
                .transpose()?,
            component: self.namespace.component(&repetition.component, self.sources)?,
            otherwise: repetition
                .otherwise
                .as_ref()
                .map(|name| self.namespace.component(name, self.sources))
                .transpose()?,
            orientation,
            location: self.location(repetition.span),
        })
    }
}
