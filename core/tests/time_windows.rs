//! Batched generation: realization matrices and time-step cubes.

use indexmap::IndexMap;
use mcprng_core::{Distribution, EntitySet, IdFilter, NamedPrng, ParticleCatalog};

const QUARKS: [&str; 6] = ["up", "down", "charm", "strange", "top", "bottom"];

fn quark_catalog() -> ParticleCatalog {
    let mut types = IndexMap::new();
    types.insert("quarks".to_string(), EntitySet::named_in_order(QUARKS));
    ParticleCatalog::new(types).expect("valid catalog")
}

fn purposes() -> Vec<String> {
    vec!["random_walk".to_string()]
}

fn build_engine() -> NamedPrng {
    NamedPrng::new(purposes(), quark_catalog()).expect("engine construction")
}

#[test]
fn later_window_matches_tail_of_wider_window() {
    let filter = IdFilter::exclude(["charm", "strange"]);
    let realizations = [4u64, 5];

    let mut wide = build_engine();
    let from_zero = wide
        .generate_over_time(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &realizations,
            0..3,
            Some(&filter),
        )
        .expect("wide window");

    let mut narrow = build_engine();
    let from_one = narrow
        .generate_over_time(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &realizations,
            1..3,
            Some(&filter),
        )
        .expect("narrow window");

    for (block_index, block) in from_one.iter().enumerate() {
        assert_eq!(block.len(), 2);
        assert_eq!(
            &from_zero[block_index][1..3],
            block.as_slice(),
            "fast-forwarded window diverged for realization index {block_index}"
        );
    }
}

#[test]
fn include_and_exclude_windows_agree() {
    let realizations = [4u64, 5];

    let mut excluding = build_engine();
    let exclude = IdFilter::exclude(["charm", "strange"]);
    let by_exclusion = excluding
        .generate_over_time(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &realizations,
            1..3,
            Some(&exclude),
        )
        .expect("exclude window");

    let mut including = build_engine();
    let include = IdFilter::include(["up", "down", "top", "bottom"]);
    let by_inclusion = including
        .generate_over_time(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &realizations,
            1..3,
            Some(&include),
        )
        .expect("include window");

    assert_eq!(by_exclusion, by_inclusion);
}

#[test]
fn generate_realizations_equals_manual_init_and_draw() {
    let ids = [0u64, 2, 4, 7, 8, 9];

    let mut manual = build_engine();
    let mut one_by_one = Vec::new();
    for &realization in &ids {
        manual
            .init_engines(&[realization], None, None)
            .expect("init");
        one_by_one.push(
            manual
                .generate(
                    Distribution::standard_normal(),
                    "quarks",
                    "random_walk",
                    Some(realization),
                    None,
                )
                .expect("draw"),
        );
    }

    let mut batched = build_engine();
    let as_list = batched
        .generate_realizations(
            Distribution::standard_normal(),
            "quarks",
            "random_walk",
            &ids,
            None,
        )
        .expect("batched draw");

    assert_eq!(one_by_one, as_list);

    // Two disjoint selectors cover the same ids as one list.
    let mut split = build_engine();
    let mut joined = split
        .generate_realizations(
            Distribution::standard_normal(),
            "quarks",
            "random_walk",
            &[0, 2, 4],
            None,
        )
        .expect("first half");
    joined.extend(
        split
            .generate_realizations(
                Distribution::standard_normal(),
                "quarks",
                "random_walk",
                &[7, 8, 9],
                None,
            )
            .expect("second half"),
    );
    assert_eq!(joined, as_list);
}

#[test]
fn selector_order_is_preserved_in_row_order() {
    let mut engine = build_engine();
    let reversed = engine
        .generate_realizations(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &[5, 2],
            None,
        )
        .expect("draw");

    let mut forward = build_engine();
    let rows = forward
        .generate_realizations(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &[2, 5],
            None,
        )
        .expect("draw");

    assert_eq!(reversed[0], rows[1], "rows follow the selector, not numeric order");
    assert_eq!(reversed[1], rows[0]);
}

#[test]
fn live_pool_rows_match_time_steps() {
    let filter = IdFilter::exclude(["charm", "strange"]);
    let realizations = [0u64, 1];

    let mut stepped = build_engine();
    stepped
        .init_engines(&realizations, Some(&["quarks"]), Some(&["random_walk"]))
        .expect("init");

    let mut cubed = build_engine();
    let cube = cubed
        .generate_over_time(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &realizations,
            0..3,
            Some(&filter),
        )
        .expect("cube");

    // Drawing the live pool three times walks the same streams the cube
    // collected, one time step per call.
    for step in 0..3 {
        let rows = stepped
            .generate_rows(
                Distribution::Uniform,
                "quarks",
                "random_walk",
                &realizations,
                Some(&filter),
            )
            .expect("rows");
        for (row_index, row) in rows.iter().enumerate() {
            assert_eq!(
                row, &cube[row_index][step],
                "mismatch at realization index {row_index}, step {step}"
            );
        }
    }
}

#[test]
fn degenerate_time_windows_are_empty() {
    let mut engine = build_engine();
    let cube = engine
        .generate_over_time(
            Distribution::Uniform,
            "quarks",
            "random_walk",
            &[0],
            2..2,
            None,
        )
        .expect("empty window");
    assert_eq!(cube.len(), 1);
    assert!(cube[0].is_empty(), "an empty time range collects no rows");
}
