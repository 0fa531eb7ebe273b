//! Shapeless matching of ingredients against container slots.
//!
//! Every ingredient must be satisfied by a different occupied slot and every
//! occupied slot must satisfy some ingredient. Ingredients may overlap
//! (a tag and an item inside that tag), so a greedy first-fit pass can reject
//! arrangements that do have a valid assignment; augmenting paths are used
//! instead.

use crate::item::Container;
use crate::tags::TagLookup;

use super::ingredient::Ingredient;

/// Find the slot consumed by each ingredient, in ingredient order.
///
/// Empty slots are skipped. Returns `None` when no one-to-one assignment
/// exists.
pub fn find_assignment(
    ingredients: &[Ingredient],
    container: &impl Container,
    tags: &impl TagLookup,
) -> Option<Vec<usize>> {
    let occupied: Vec<usize> = (0..container.size())
        .filter(|&slot| container.item(slot).is_some())
        .collect();

    if occupied.len() != ingredients.len() {
        return None;
    }

    // candidates[i] = positions in `occupied` that ingredient i accepts
    let candidates: Vec<Vec<usize>> = ingredients
        .iter()
        .map(|ingredient| {
            occupied
                .iter()
                .enumerate()
                .filter(|&(_, &slot)| {
                    container
                        .item(slot)
                        .is_some_and(|stack| ingredient.test(stack, tags))
                })
                .map(|(pos, _)| pos)
                .collect()
        })
        .collect();

    let mut owner: Vec<Option<usize>> = vec![None; occupied.len()];
    for ingredient in 0..ingredients.len() {
        let mut visited = vec![false; occupied.len()];
        if !augment(ingredient, &candidates, &mut owner, &mut visited) {
            return None;
        }
    }

    let mut assignment = vec![0; ingredients.len()];
    for (pos, ingredient) in owner.iter().enumerate() {
        if let Some(ingredient) = ingredient {
            assignment[*ingredient] = occupied[pos];
        }
    }
    Some(assignment)
}

fn augment(
    ingredient: usize,
    candidates: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &pos in &candidates[ingredient] {
        if visited[pos] {
            continue;
        }
        visited[pos] = true;

        let free = match owner[pos] {
            None => true,
            Some(current) => augment(current, candidates, owner, visited),
        };
        if free {
            owner[pos] = Some(ingredient);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemStack, SlotContainer};
    use crate::resource::ResourceLocation;
    use crate::tags::{NoTags, TagRegistry};

    fn id(s: &str) -> ResourceLocation {
        s.parse().unwrap()
    }

    fn stack(s: &str) -> ItemStack {
        ItemStack::new(id(s), 1)
    }

    fn item(s: &str) -> Ingredient {
        Ingredient::of_item(id(s))
    }

    #[test]
    fn test_order_does_not_matter() {
        let ingredients = [item("a:x"), item("a:y")];
        let container = SlotContainer::from_stacks([stack("a:y"), stack("a:x")]);
        assert_eq!(
            find_assignment(&ingredients, &container, &NoTags),
            Some(vec![1, 0])
        );
    }

    #[test]
    fn test_duplicate_requirement_needs_two_items() {
        let ingredients = [item("a:x"), item("a:x")];
        let one = SlotContainer::from_stacks([stack("a:x"), stack("a:y")]);
        assert_eq!(find_assignment(&ingredients, &one, &NoTags), None);

        let two = SlotContainer::from_stacks([stack("a:x"), stack("a:x")]);
        assert!(find_assignment(&ingredients, &two, &NoTags).is_some());
    }

    #[test]
    fn test_overlapping_ingredients_need_reassignment() {
        // First-fit would give slot 0 to the either-or ingredient and then
        // strand the strict one.
        let either = Ingredient::of_items([id("a:x"), id("a:y")]);
        let ingredients = [either, item("a:x")];
        let container = SlotContainer::from_stacks([stack("a:x"), stack("a:y")]);
        assert_eq!(
            find_assignment(&ingredients, &container, &NoTags),
            Some(vec![1, 0])
        );
    }

    #[test]
    fn test_overlapping_tag_and_item() {
        let mut tags = TagRegistry::new();
        tags.tag(id("a:runes")).add([id("a:water"), id("a:fire")]);
        let ingredients = [Ingredient::of_tag(id("a:runes")), item("a:water")];
        let container = SlotContainer::from_stacks([stack("a:water"), stack("a:fire")]);
        assert_eq!(
            find_assignment(&ingredients, &container, &tags),
            Some(vec![1, 0])
        );
    }

    #[test]
    fn test_extra_item_rejected() {
        let ingredients = [item("a:x")];
        let container = SlotContainer::from_stacks([stack("a:x"), stack("a:z")]);
        assert_eq!(find_assignment(&ingredients, &container, &NoTags), None);
    }

    #[test]
    fn test_empty_slots_skipped() {
        let ingredients = [item("a:x"), item("a:y")];
        let mut container = SlotContainer::new(6);
        container.set(2, Some(stack("a:y")));
        container.set(5, Some(stack("a:x")));
        assert_eq!(
            find_assignment(&ingredients, &container, &NoTags),
            Some(vec![5, 2])
        );
    }

    #[test]
    fn test_no_ingredients_matches_empty_container() {
        assert_eq!(
            find_assignment(&[], &SlotContainer::new(4), &NoTags),
            Some(vec![])
        );
        let occupied = SlotContainer::from_stacks([stack("a:x")]);
        assert_eq!(find_assignment(&[], &occupied, &NoTags), None);
    }
}
