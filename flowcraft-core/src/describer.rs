use crate::flow::FlowNode;
use std::fmt::{self, Write};
use std::iter;

/// Traverses a flow to build a pretty-printed description of it.
///
/// Each step consumes the describer and hands back a new one; only the
/// description grows, and nested traversals return with the indentation and
/// sequence numbering they were given.
#[derive(Debug, Clone, Default)]
pub struct FlowDescriber {
    description: String,
    indent_level: usize,
    sequence_prefix: String,
}

impl FlowDescriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn into_description(self) -> String {
        self.description
    }

    pub fn traverse(self, node: &FlowNode) -> Self {
        match node {
            FlowNode::Only(action) => self.append(action.name()),
            FlowNode::Branch { default, branches } => {
                self.append("Branch").details(|describer| {
                    branches
                        .iter()
                        .fold(describer, |describer, (name, branch)| {
                            describer
                                .label(format_args!("If {name}"))
                                .traverse(&branch.flow)
                        })
                        .label("Otherwise")
                        .traverse(default)
                })
            }
            FlowNode::Sequence {
                first,
                middle,
                last,
            } => self.append("Sequence").details(|describer| {
                iter::once(&**first)
                    .chain(middle)
                    .chain(iter::once(&**last))
                    .enumerate()
                    .fold(describer, |describer, (index, step)| {
                        describer.sequence_entry(index + 1, step)
                    })
            }),
        }
    }

    fn append(mut self, value: impl fmt::Display) -> Self {
        let _ = write!(self.description, "{value}");
        self
    }

    fn newline(mut self) -> Self {
        self.description.push('\n');
        self.description
            .extend(iter::repeat('\t').take(self.indent_level));
        self
    }

    fn label(self, label: impl fmt::Display) -> Self {
        self.newline().append(label).append(": ")
    }

    fn details(self, render: impl FnOnce(Self) -> Self) -> Self {
        let indent_level = self.indent_level;
        let rendered = render(Self {
            indent_level: indent_level + 1,
            ..self
        });
        Self {
            indent_level,
            ..rendered
        }
    }

    fn sequence_entry(self, number: usize, step: &FlowNode) -> Self {
        let prefix = self.sequence_prefix.clone();
        let labelled = self.label(format_args!("{prefix}{number}"));
        let traversed = Self {
            sequence_prefix: format!("{prefix}{number}."),
            ..labelled
        }
        .traverse(step);
        Self {
            sequence_prefix: prefix,
            ..traversed
        }
    }
}

/// Anything with a flow structure that can be described.
pub trait Describable {
    fn describe_with(&self, describer: FlowDescriber) -> FlowDescriber;

    /// Obtain a pretty-printed representation of the structure.
    fn describe(&self) -> String {
        self.describe_with(FlowDescriber::new()).into_description()
    }
}

impl Describable for FlowNode {
    fn describe_with(&self, describer: FlowDescriber) -> FlowDescriber {
        describer.traverse(self)
    }
}

impl<I, O> Describable for crate::Flow<I, O> {
    fn describe_with(&self, describer: FlowDescriber) -> FlowDescriber {
        describer.traverse(self.node())
    }
}
