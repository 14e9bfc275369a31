//! Renderers turn a [`BindingPlan`] into text. Glue-code generators for a
//! particular binding runtime implement [`Renderer`] outside this crate;
//! the outline renderer here is what `hydra plan` prints.

use std::fmt::{self, Write};

use hydra_dom::Dom;

use crate::plan::{BindingEntry, BindingPlan, EntryItem, MemberBinding};

pub trait Renderer {
    fn render(&self, dom: &Dom, plan: &BindingPlan, out: &mut dyn Write) -> fmt::Result;

    fn render_to_string(&self, dom: &Dom, plan: &BindingPlan) -> String {
        let mut text = String::new();
        // Writing into a String cannot fail
        let _ = self.render(dom, plan, &mut text);
        text
    }
}

/// Human-readable summary of a plan, one line per entity and member.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn render(&self, dom: &Dom, plan: &BindingPlan, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, "module {}", plan.module)?;
        for fragment in &plan.prolog {
            writeln!(out, "| {}", fragment.trim_end())?;
        }
        for entry in &plan.entries {
            render_entry(dom, entry, out)?;
        }
        Ok(())
    }
}

fn render_entry(dom: &Dom, entry: &BindingEntry, out: &mut dyn Write) -> fmt::Result {
    match &entry.item {
        EntryItem::Record(record) => {
            let kind = dom.kind(entry.node);
            if record.is_abstract {
                write!(out, "abstract ")?;
            }
            write!(out, "{kind} {}", entry.full_name)?;
            if !record.bases.is_empty() {
                let bases: Vec<String> = record.bases.iter().map(|base| dom.full_name(*base)).collect();
                write!(out, " : {}", bases.join(", "))?;
            }
            writeln!(out)?;
            for constructor in &record.constructors {
                render_member(dom, "init", constructor, out)?;
            }
            for field in &record.fields {
                render_member(dom, "field", field, out)?;
            }
            for method in &record.methods {
                render_member(dom, "method", method, out)?;
            }
            for (name, _) in &record.addon_methods {
                writeln!(out, "  addon {name}")?;
            }
        }
        EntryItem::Enum(enumeration) => {
            let name = if entry.name.is_empty() { "<anonymous>" } else { entry.full_name.as_str() };
            write!(out, "enum {name}")?;
            if enumeration.export_values {
                write!(out, " [export]")?;
            }
            writeln!(out)?;
            for constant in &enumeration.constants {
                writeln!(out, "  {constant}")?;
            }
        }
        EntryItem::Function(function) => {
            write!(out, "function {}", entry.full_name)?;
            render_member_tail(dom, function, out)?;
        }
    }
    Ok(())
}

fn render_member(dom: &Dom, label: &str, member: &MemberBinding, out: &mut dyn Write) -> fmt::Result {
    if member.is_skipped() {
        write!(out, "  # ")?;
    } else {
        write!(out, "  ")?;
    }
    if member.is_static {
        write!(out, "static ")?;
    }
    write!(out, "{label}")?;
    // Constructors are unnamed on the binding side
    if label != "init" {
        write!(out, " {}", member.name)?;
    }
    render_member_tail(dom, member, out)
}

fn render_member_tail(dom: &Dom, member: &MemberBinding, out: &mut dyn Write) -> fmt::Result {
    if dom.kind(member.node).is_callable() {
        write!(out, "({})", member.signature)?;
    }
    if member.overloaded {
        write!(out, " [overloaded]")?;
    }
    if let Some(policy) = &member.return_policy {
        write!(out, " [{policy}]")?;
    }
    if member.replacement.is_some() {
        write!(out, " [replaced]")?;
    }
    if !member.missing.is_empty() {
        let missing: Vec<String> = member.missing.iter().map(|dep| dom.full_name(*dep)).collect();
        write!(out, " [needs {}]", missing.join(", "))?;
    }
    writeln!(out)
}
