// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Rendering of the discovered model into layout text.

use crate::LayoutError;
use crate::builder::LayoutBuilder;
use crate::version::LayoutVersion;
use model::policy::CONTAINER_TYPE;
use model::{Container, ContainerOptions, ObjectRegistry, ObjectType, PortLink};
use provider::AttributeProvider;
use walk::FabricModel;

/// Legacy node names jump to the next multiple of this at every type-tag
/// transition, so names stay collision-free across type groups.
const NODE_NAME_GAP: u32 = 100;

/// Renders one model piece into a [`LayoutBuilder`].
pub(crate) trait Render {
    type Context;

    fn render(&self, ctx: &Self::Context, out: &mut LayoutBuilder);
}

/// Render the whole document: containers, then the flat object section,
/// then connections.  The only queries made here are per-object enrichment
/// lookups; everything structural comes from the model.
pub(crate) fn render_fabric<P: AttributeProvider + ?Sized>(
    provider: &P,
    fabric: &FabricModel,
    version: LayoutVersion,
) -> Result<String, LayoutError> {
    let mut out = LayoutBuilder::new();
    out.open("layout");
    out.line(format!("version = {}", version.number()));

    out.open("containers");
    for container in fabric.containers() {
        container.render(&version, &mut out);
    }
    out.close();

    out.open("objects");
    for object in fabric.objects() {
        let fields = provider
            .enrichment(object.key())
            .map_err(|e| LayoutError::Enrichment {
                object: object.key().clone(),
                source: e,
            })?;
        out.open(object.key().to_string());
        if let Some(label) = object.label() {
            out.line(format!("label = \"{label}\""));
        }
        for (name, value) in &fields {
            out.line(format!("{name} = \"{value}\""));
        }
        out.close();
    }
    out.close();

    out.open("connections");
    for (index, link) in fabric.links().iter().enumerate() {
        link.render(&index, &mut out);
    }
    out.close();

    out.close();
    Ok(out.finish())
}

impl Render for Container {
    type Context = LayoutVersion;

    fn render(&self, version: &LayoutVersion, out: &mut LayoutBuilder) {
        out.open(format!("{CONTAINER_TYPE}@{}", self.id()));
        match self.parent() {
            Some(parent) => out.line(format!("parent = {CONTAINER_TYPE}@{parent}")),
            None => out.line("parent = none"),
        }
        out.line(format!("options = {}", options_text(self.options())));
        out.open("objects");
        match version {
            LayoutVersion::V9 => render_legacy_listing(self.objects(), out),
            LayoutVersion::V10 => render_compact_listing(self.objects(), out),
        }
        out.close();
        out.close();
    }
}

impl Render for PortLink {
    type Context = usize;

    fn render(&self, index: &usize, out: &mut LayoutBuilder) {
        out.open(format!("link@{index}"));
        out.line(format!("endpoint1 = {}", self.endpoint_a()));
        out.line(format!("endpoint2 = {}", self.endpoint_b()));
        out.close();
    }
}

/// Render options as named flags.  Bits outside the known set are surfaced
/// with an `UNRECOGNIZED` marker rather than silently dropped.
fn options_text(options: ContainerOptions) -> String {
    let mut names: Vec<String> = options
        .iter_names()
        .map(|(name, _)| name.to_string())
        .collect();
    let unknown = options.unrecognized_bits();
    if unknown != 0 {
        names.push(format!("UNRECOGNIZED({unknown:#x})"));
    }
    if names.is_empty() {
        "<none>".to_string()
    } else {
        format!("<{}>", names.join(" | "))
    }
}

/// Legacy (version 9) listing: one `obj@<n>` block per object instance.
fn render_legacy_listing(objects: &ObjectRegistry, out: &mut LayoutBuilder) {
    let mut counter: u32 = 0;
    let mut prev: Option<&ObjectType> = None;
    for object in objects {
        if prev.is_some_and(|tag| tag != object.key().object_type()) {
            counter = (counter / NODE_NAME_GAP + 1) * NODE_NAME_GAP;
        }
        out.open(format!("obj@{counter}"));
        out.line(format!("type = {}", object.key().object_type()));
        out.line(format!("id = {}", object.key().id()));
        if let Some(label) = object.label() {
            out.line(format!("label = \"{label}\""));
        }
        out.close();
        counter += 1;
        prev = Some(object.key().object_type());
    }
}

/// Compacting (version 10) listing: one `set@<type>` block per run of equal
/// type tags in the sorted list.
///
/// A new block starts only at a type-tag transition; an id gap inside a run
/// stays inside the block, so the reported `[min..max]` range may cover ids
/// that do not exist.  Consumers treat the range as approximate.
fn render_compact_listing(objects: &ObjectRegistry, out: &mut LayoutBuilder) {
    let mut run: Option<(&ObjectType, u32, u32)> = None;
    for object in objects {
        let (tag, id) = (object.key().object_type(), object.key().id());
        run = match run {
            // ids ascend within a run, so the newest id is the max
            Some((prev, min, _)) if prev == tag => Some((prev, min, id)),
            Some(finished) => {
                emit_object_set(finished, out);
                Some((tag, id, id))
            }
            None => Some((tag, id, id)),
        };
    }
    if let Some(finished) = run {
        emit_object_set(finished, out);
    }
}

fn emit_object_set((tag, min, max): (&ObjectType, u32, u32), out: &mut LayoutBuilder) {
    out.open(format!("set@{tag}"));
    out.line(format!("type = {tag}"));
    if min == max {
        out.line(format!("ids = [{min}]"));
    } else {
        out.line(format!("ids = [{min}..{max}]"));
    }
    out.close();
}
