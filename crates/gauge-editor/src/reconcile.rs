//! Attribute reconciliation
//!
//! Pure functions that merge live MBean attributes with a saved gauge
//! selection, and project the checklist back into the persisted form.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{AttributeChoice, MBeanAttribute};

/// Heading shown while no MBean has been chosen.
pub const NEW_GAUGE_HEADING: &str = "<New>";

const ZERO_WIDTH_SPACE: char = '\u{200b}';
const NO_BREAK_SPACE: char = '\u{a0}';

/// Sort attributes by name, ascending.
pub fn sort_attributes(attributes: &mut [MBeanAttribute]) {
    attributes.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Merge the names the live MBean reports with the attributes of a saved gauge.
///
/// Live names start unchecked. Saved attributes are checked and keep their
/// counter flag; a saved name the MBean no longer exposes is kept with
/// `available = false`. The result is ordered by name.
pub fn merge_attribute_choices(
    available_names: &[String],
    saved: &[MBeanAttribute],
) -> Vec<AttributeChoice> {
    let live: BTreeSet<&str> = available_names.iter().map(String::as_str).collect();
    let selected: BTreeMap<&str, bool> = saved
        .iter()
        .map(|attr| (attr.name.as_str(), attr.counter))
        .collect();

    let names: BTreeSet<&str> = live.iter().chain(selected.keys()).copied().collect();

    names
        .into_iter()
        .filter_map(|name| match (live.contains(name), selected.get(name)) {
            (true, Some(&counter)) => Some(AttributeChoice {
                name: name.to_string(),
                checked: true,
                counter,
                available: true,
            }),
            (true, None) => Some(AttributeChoice::live(name)),
            (false, Some(&counter)) => Some(AttributeChoice::stale(name, counter)),
            (false, None) => None,
        })
        .collect()
}

/// Checked subset of the checklist as persisted attributes, sorted by name.
pub fn project_checked(choices: &[AttributeChoice]) -> Vec<MBeanAttribute> {
    let mut attributes: Vec<MBeanAttribute> = choices
        .iter()
        .filter(|choice| choice.checked)
        .map(|choice| MBeanAttribute::new(choice.name.clone(), choice.counter))
        .collect();
    sort_attributes(&mut attributes);
    attributes
}

/// Heading text for an MBean display name.
///
/// Adds a break opportunity before every `/` and pins spaces, so long object
/// names wrap on path segments rather than on words.
pub fn format_heading(display: &str) -> String {
    let mut heading = String::with_capacity(display.len() + 8);
    for ch in display.chars() {
        match ch {
            '/' => {
                heading.push(ZERO_WIDTH_SPACE);
                heading.push('/');
            }
            ' ' => heading.push(NO_BREAK_SPACE),
            other => heading.push(other),
        }
    }
    heading
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn merge_marks_live_saved_and_stale_attributes() {
        let merged = merge_attribute_choices(
            &names(&["A", "B"]),
            &[MBeanAttribute::new("B", true), MBeanAttribute::new("C", false)],
        );

        assert_eq!(
            merged,
            vec![
                AttributeChoice::live("A"),
                AttributeChoice {
                    name: "B".to_string(),
                    checked: true,
                    counter: true,
                    available: true,
                },
                AttributeChoice::stale("C", false),
            ]
        );
    }

    #[test]
    fn merge_with_nothing_saved_is_all_unchecked() {
        let merged = merge_attribute_choices(&names(&["Z", "M"]), &[]);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|c| !c.checked && c.available));
        assert_eq!(merged[0].name, "M");
    }

    #[test]
    fn merge_with_no_live_attributes_keeps_every_saved_one() {
        let merged = merge_attribute_choices(&[], &[MBeanAttribute::new("Old", true)]);
        assert_eq!(merged, vec![AttributeChoice::stale("Old", true)]);
    }

    #[test]
    fn projection_is_checked_subset_sorted_for_any_input_order() {
        let base = vec![
            AttributeChoice {
                checked: true,
                counter: true,
                ..AttributeChoice::live("gamma")
            },
            AttributeChoice::live("alpha"),
            AttributeChoice {
                checked: true,
                ..AttributeChoice::live("beta")
            },
            AttributeChoice::stale("delta", false),
        ];
        let expected = vec![
            MBeanAttribute::new("beta", false),
            MBeanAttribute::new("delta", false),
            MBeanAttribute::new("gamma", true),
        ];

        // every rotation and its reverse
        for shift in 0..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(shift);
            assert_eq!(project_checked(&rotated), expected);
            rotated.reverse();
            assert_eq!(project_checked(&rotated), expected);
        }
    }

    #[test]
    fn projection_of_unchecked_list_is_empty() {
        let choices = vec![AttributeChoice::live("a"), AttributeChoice::live("b")];
        assert!(project_checked(&choices).is_empty());
    }

    #[test]
    fn projection_covers_every_checked_flag_combination() {
        let names = ["c", "a", "b"];
        for mask in 0u8..8 {
            let choices: Vec<AttributeChoice> = names
                .iter()
                .enumerate()
                .map(|(i, name)| AttributeChoice {
                    checked: mask & (1 << i) != 0,
                    counter: i % 2 == 0,
                    ..AttributeChoice::live(*name)
                })
                .collect();

            let projected = project_checked(&choices);
            let expected_count = mask.count_ones() as usize;
            assert_eq!(projected.len(), expected_count);
            assert!(projected.windows(2).all(|w| w[0].name < w[1].name));
            for attr in &projected {
                let choice = choices.iter().find(|c| c.name == attr.name).unwrap();
                assert!(choice.checked);
                assert_eq!(choice.counter, attr.counter);
            }
        }
    }

    #[test]
    fn heading_breaks_on_slashes_and_pins_spaces() {
        assert_eq!(
            format_heading("java.lang / Memory Pool"),
            "java.lang\u{a0}\u{200b}/\u{a0}Memory\u{a0}Pool"
        );
        assert_eq!(format_heading("plain"), "plain");
    }
}
