use construction::*;
use notch_types::{default_notches, BuildConfig, Notch};
use proptest::prelude::*;

fn notch_strategy() -> impl Strategy<Value = Vec<Notch>> {
    prop::collection::vec((0.0f64..8.0, 0.01f64..1.0), 0..24).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (start, width))| Notch::new(format!("Notch {}", i + 1), start, start + width))
            .collect()
    })
}

proptest! {
    #[test]
    fn plan_has_one_step_per_notch_plus_bar(notches in notch_strategy()) {
        let plan = plan_construction(&BuildConfig::default(), &notches);
        prop_assert_eq!(plan.len(), notches.len() + 1);
        let is_create_box = matches!(plan.steps[0], PlanStep::CreateBox { .. });
        prop_assert!(is_create_box);
    }

    #[test]
    fn cuts_preserve_input_order(notches in notch_strategy()) {
        let plan = plan_construction(&BuildConfig::default(), &notches);
        for (step, (i, notch)) in plan.cuts().zip(notches.iter().enumerate()) {
            let PlanStep::SubtractBox { notch_index, notch_name, translation, .. } = step else {
                unreachable!("cuts() yields only subtractions");
            };
            prop_assert_eq!(*notch_index, i);
            prop_assert_eq!(notch_name, &notch.name);
            prop_assert!((translation[1] - notch.end * 25.4).abs() < 1e-9);
        }
    }

    #[test]
    fn planning_is_deterministic(notches in notch_strategy()) {
        let config = BuildConfig::default();
        prop_assert_eq!(
            plan_construction(&config, &notches),
            plan_construction(&config, &notches)
        );
    }
}

#[test]
fn empty_layout_plans_bar_only() {
    let plan = plan_construction(&BuildConfig::default(), &[]);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.cuts().count(), 0);
}

#[test]
fn unsorted_notches_keep_list_order() {
    let notches = vec![
        Notch::new("late", 6.0, 6.13),
        Notch::new("early", 1.0, 1.13),
    ];
    let plan = plan_construction(&BuildConfig::default(), &notches);
    let names: Vec<_> = plan
        .cuts()
        .map(|s| match s {
            PlanStep::SubtractBox { notch_name, .. } => notch_name.as_str(),
            PlanStep::CreateBox { .. } => unreachable!(),
        })
        .collect();
    assert_eq!(names, ["late", "early"]);
}

#[test]
fn tool_box_uses_fixed_cross_section() {
    let plan = plan_construction(&BuildConfig::default(), &default_notches());
    for step in plan.cuts() {
        let PlanStep::SubtractBox {
            dims, translation, ..
        } = step
        else {
            unreachable!()
        };
        assert!((dims[1] - 3.302).abs() < 1e-9);
        // Overshoot on both sides in x and below the bar in z
        assert!((dims[0] + 2.0 * translation[0] - 12.7).abs() < 1e-9);
        assert!((dims[2] + translation[2] - 3.302).abs() < 1e-9);
    }
}

#[test]
fn flush_profile_places_tool_on_bar_faces() {
    let mut config = BuildConfig::default();
    config.cut.overshoot = 0.0;
    let plan = plan_construction(&config, &[Notch::new("Notch 1", 0.73, 0.86)]);
    let Some(PlanStep::SubtractBox {
        dims, translation, ..
    }) = plan.cuts().next()
    else {
        unreachable!()
    };
    assert!((dims[0] - 12.7).abs() < 1e-9);
    assert!((dims[2] - 3.302).abs() < 1e-9);
    assert_eq!(translation[0], 0.0);
    assert!((translation[1] - 21.844).abs() < 1e-9);
}
