//! Element analysis for the properties panel.
//!
//! `StyleAnalyzer` is a pure function of one element and its computed
//! style: attributes, classes, direct text, utility classes decoded into
//! the property they set, and the computed values worth showing.

use crate::host::Host;
use insp_core::css::class_tokens;
use insp_core::id::{ElementId, ID_ATTRIBUTE};
use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix of the inspector's own marker classes.
const MARKER_PREFIX: &str = "inspector-";

const HIDDEN_ATTRIBUTES: [&str; 3] = ["class", "style", ID_ATTRIBUTE];

const STANDALONE_CLASSES: &[(&str, &str, &str)] = &[
    ("flex", "display", "flex"),
    ("grid", "display", "grid"),
    ("hidden", "display", "hidden"),
    ("block", "display", "block"),
    ("inline-block", "display", "inline-block"),
    ("absolute", "position", "absolute"),
    ("relative", "position", "relative"),
    ("fixed", "position", "fixed"),
    ("uppercase", "text-transform", "uppercase"),
    ("whitespace-nowrap", "white-space", "nowrap"),
    ("table-fixed", "table-layout", "fixed"),
    ("list-disc", "list-style-type", "disc"),
    ("list-inside", "list-style-position", "inside"),
];

/// Checked in order; the first matching prefix wins.
const PREFIX_FAMILIES: &[(&str, &str)] = &[
    ("bg-", "background-color"),
    ("font-", "font"),
    ("p-", "padding"),
    ("px-", "padding-x"),
    ("py-", "padding-y"),
    ("pt-", "padding-top"),
    ("pr-", "padding-right"),
    ("pb-", "padding-bottom"),
    ("pl-", "padding-left"),
    ("m-", "margin"),
    ("mx-", "margin-x"),
    ("my-", "margin-y"),
    ("mt-", "margin-top"),
    ("mr-", "margin-right"),
    ("mb-", "margin-bottom"),
    ("ml-", "margin-left"),
    ("w-", "width"),
    ("h-", "height"),
    ("gap-", "gap"),
    ("rounded", "border-radius"),
    ("shadow", "box-shadow"),
    ("border", "border"),
    ("items-", "align-items"),
    ("justify-", "justify-content"),
];

const TYPOGRAPHY: [&str; 4] = ["color", "font-size", "font-weight", "font-family"];
const BACKGROUNDS: [&str; 3] = ["background-color", "background-image", "background-blend-mode"];
const BOX_MODEL: [&str; 14] = [
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "width",
    "height",
];
const POSITIONING: [&str; 6] = ["position", "top", "right", "bottom", "left", "z-index"];

/// One utility class and the property it sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityProperty {
    pub property: String,
    pub value: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleValue {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub utilities: Vec<UtilityProperty>,
    pub typography: Vec<StyleValue>,
    pub backgrounds: Vec<StyleValue>,
    pub box_model: BTreeMap<String, String>,
    pub positioning: BTreeMap<String, String>,
}

/// What the properties panel receives for the inspected element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementView {
    pub id: Option<ElementId>,
    pub markup: String,
    pub analysis: Analysis,
}

pub trait Analyzer<H: Host> {
    fn analyze(&self, host: &H, node: &H::Node) -> Analysis;
}

/// Collaborator that displays the inspected element.
pub trait PropertiesPanel {
    fn show(&mut self, view: &ElementView);
    fn hide(&mut self);
}

/// Default analyzer for utility-class styled content.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleAnalyzer;

impl<H: Host> Analyzer<H> for StyleAnalyzer {
    fn analyze(&self, host: &H, node: &H::Node) -> Analysis {
        let classes: Vec<String> = host
            .attribute(node, "class")
            .map(|v| {
                class_tokens(&v)
                    .filter(|c| !c.starts_with(MARKER_PREFIX))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let computed = |props: &[&str]| -> Vec<StyleValue> {
            props
                .iter()
                .filter_map(|p| {
                    let value = host.computed_style(node, p);
                    is_notable(&value).then(|| StyleValue {
                        property: p.to_string(),
                        value,
                    })
                })
                .collect()
        };

        let box_model = BOX_MODEL
            .iter()
            .filter_map(|p| {
                let value = host.computed_style(node, p);
                (!value.is_empty() && value != "0px").then(|| (p.to_string(), value))
            })
            .collect();

        let positioning = if host.computed_style(node, "position") != "static" {
            POSITIONING
                .iter()
                .filter_map(|p| {
                    let value = host.computed_style(node, p);
                    (!value.is_empty() && value != "auto").then(|| (p.to_string(), value))
                })
                .collect()
        } else {
            BTreeMap::new()
        };

        Analysis {
            tag: host.tag(node),
            attributes: host
                .attributes(node)
                .into_iter()
                .filter(|(name, _)| !HIDDEN_ATTRIBUTES.contains(&name.as_str()))
                .collect(),
            utilities: classes.iter().filter_map(|c| utility(c)).collect(),
            classes,
            text: host.direct_text(node),
            typography: computed(&TYPOGRAPHY),
            backgrounds: computed(&BACKGROUNDS),
            box_model,
            positioning,
        }
    }
}

fn is_notable(value: &str) -> bool {
    !value.is_empty()
        && !matches!(value, "0px" | "auto" | "normal" | "none")
        && !value.starts_with("rgba(0, 0, 0, 0)")
}

fn property(property: &str, value: &str, class: &str) -> UtilityProperty {
    UtilityProperty {
        property: property.to_string(),
        value: value.to_string(),
        class: class.to_string(),
    }
}

/// Decode one utility class, or `None` when it sets nothing recognisable.
pub fn utility(class: &str) -> Option<UtilityProperty> {
    if let Some((_, prop, value)) = STANDALONE_CLASSES.iter().find(|(c, _, _)| *c == class) {
        return Some(property(prop, value, class));
    }

    if let Some(base) = class.strip_prefix("hover:") {
        if base == "underline" {
            return Some(property("hover", "underline", class));
        }
        return base
            .strip_prefix("bg-")
            .map(|color| property("hover-background-color", color, class));
    }

    if let Some(value) = class.strip_prefix("text-") {
        // `text-slate-700` is a colour, `text-center` an alignment,
        // anything else a size.
        let shade = value
            .split_once('-')
            .is_some_and(|(_, s)| s.starts_with(|c: char| c.is_ascii_digit()));
        let prop = if shade {
            "color"
        } else if matches!(value, "left" | "center" | "right" | "justify") {
            "text-align"
        } else {
            "font-size"
        };
        return Some(property(prop, value, class));
    }

    let (prefix, prop) = PREFIX_FAMILIES.iter().find(|(p, _)| class.starts_with(p))?;
    let value = &class[prefix.len()..];
    match value {
        "" if matches!(*prefix, "rounded" | "shadow" | "border") => {
            Some(property(prop, "default", class))
        }
        "" => None,
        _ => Some(property(prop, value, class)),
    }
}
