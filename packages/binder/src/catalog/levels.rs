//! Data specific to each of the four hierarchy levels.

use crate::config::{MLO, XCRI};
use crate::elements::{Credit, Element, Location, NodeData, Qualification, Temporal};
use crate::xml::XmlElement;

/// Closed set of hierarchy levels, each carrying its own fields.
///
/// Child nodes are not stored here but in the arena; see
/// [`super::Composite::children`]. The root's generation timestamp lives on
/// [`super::Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Level {
    Catalog,
    Provider(ProviderLevel),
    Course(CourseLevel),
    Presentation(PresentationLevel),
}

impl Level {
    /// Element name of the level.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Level::Catalog => "catalog",
            Level::Provider(_) => "provider",
            Level::Course(_) => "course",
            Level::Presentation(_) => "presentation",
        }
    }

    /// Append level fields after the shared composite children.
    pub(super) fn write_fields(&self, element: &mut XmlElement) {
        match self {
            Level::Catalog => {}
            Level::Provider(provider) => {
                if let Some(location) = &provider.location {
                    element.push_child(location.to_xml());
                }
            }
            Level::Course(course) => {
                for qualification in &course.qualifications {
                    element.push_child(qualification.to_xml());
                }
                for credit in &course.credits {
                    element.push_child(credit.to_xml());
                }
            }
            Level::Presentation(presentation) => presentation.write_fields(element),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderLevel {
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseLevel {
    pub qualifications: Vec<Qualification>,
    pub credits: Vec<Credit>,
}

/// A concrete run of a course: timing, mode of study and cost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationLevel {
    pub start: Option<Temporal>,
    pub end: Option<Temporal>,
    pub apply_from: Option<Temporal>,
    pub apply_until: Option<Temporal>,
    pub duration: Option<NodeData>,
    pub study_mode: Option<NodeData>,
    pub attendance_mode: Option<NodeData>,
    pub attendance_pattern: Option<NodeData>,
    pub languages_of_instruction: Vec<NodeData>,
    pub places: Option<NodeData>,
    pub cost: Option<NodeData>,
}

impl PresentationLevel {
    fn write_fields(&self, element: &mut XmlElement) {
        let temporals = [
            (&self.start, "start", &MLO),
            (&self.end, "end", &XCRI),
            (&self.apply_from, "applyFrom", &XCRI),
            (&self.apply_until, "applyUntil", &XCRI),
        ];
        for (value, name, namespace) in temporals {
            if let Some(temporal) = value {
                element.push_child(temporal.to_xml(name, namespace));
            }
        }

        let singles = [
            (&self.duration, "duration", &MLO),
            (&self.study_mode, "studyMode", &XCRI),
            (&self.attendance_mode, "attendanceMode", &XCRI),
            (&self.attendance_pattern, "attendancePattern", &XCRI),
        ];
        for (value, name, namespace) in singles {
            if let Some(node) = value {
                element.push_child(node.to_xml(name, namespace));
            }
        }
        for language in &self.languages_of_instruction {
            element.push_child(language.to_xml("languageOfInstruction", &MLO));
        }
        if let Some(places) = &self.places {
            element.push_child(places.to_xml("places", &MLO));
        }
        if let Some(cost) = &self.cost {
            element.push_child(cost.to_xml("cost", &MLO));
        }
    }
}
