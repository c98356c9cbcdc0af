//! 선삭 원가 계산 회귀 테스트.
use machining_cost_toolbox::machining::{
    compute_turning_job, compute_turning_job_with, evaluate_turning_job, validate_turning_job,
    Constraint, DegenerateCutPolicy, DomainError, MachiningError, TurningJobInput,
    TurningProcess,
};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn sample() -> TurningJobInput {
    TurningJobInput {
        raw_length_mm: 250.0,
        raw_diameter_mm: 38.0,
        final_diameter_mm: 36.0,
        density_g_per_cm3: 7.85,
        cost_per_kg: 55.0,
        feed_rate_mm_per_rev: 0.20,
        cutting_speed_m_per_min: 20.0,
        machine_hour_rate: 800.0,
        extra_time_min: 5.0,
    }
}

#[test]
fn reference_job() {
    let out = compute_turning_job(sample()).expect("turning");
    assert_close("rpm", out.spindle_speed_rpm, 176.838_825_657_661_5, 1e-9);
    assert_close("weight", out.weight_kg, 2.225_700_585_343_858_5, 1e-9);
    assert_close("material", out.material_cost, 122.413_532_193_912_22, 1e-9);
    assert_close("tm", out.machining_time_min, 7.068_583_470_577_034, 1e-9);
    assert_close("total time", out.total_time_min, 12.068_583_470_577_034, 1e-9);
    assert_close("machining", out.machining_cost, 160.914_446_274_360_44, 1e-9);
    assert_close("total", out.total_cost, 283.327_978_468_272_65, 1e-9);
    assert!(!out.is_unbounded());
}

#[test]
fn total_is_material_plus_machining() {
    for extra in [0.0, 5.0, 12.0] {
        let out = compute_turning_job(TurningJobInput {
            extra_time_min: extra,
            ..sample()
        })
        .expect("turning");
        assert_eq!(out.total_cost, out.material_cost + out.machining_cost);
        assert_eq!(out.total_time_min, out.machining_time_min + extra);
    }
}

#[test]
fn same_input_same_output() {
    let a = compute_turning_job(sample()).expect("a");
    let b = compute_turning_job(sample()).expect("b");
    assert_eq!(a, b);
}

#[test]
fn zero_feed_gives_infinite_time() {
    let out = compute_turning_job(TurningJobInput {
        feed_rate_mm_per_rev: 0.0,
        ..sample()
    })
    .expect("infinite path");
    assert!(out.machining_time_min.is_infinite());
    assert!(out.total_time_min.is_infinite());
    assert!(out.machining_cost.is_infinite());
    assert!(out.total_cost.is_infinite());
    assert!(!out.total_cost.is_nan());
    assert!(out.material_cost.is_finite());
    assert!(out.is_unbounded());
}

#[test]
fn zero_cutting_speed_gives_infinite_time() {
    let out = compute_turning_job(TurningJobInput {
        cutting_speed_m_per_min: 0.0,
        ..sample()
    })
    .expect("infinite path");
    assert_eq!(out.spindle_speed_rpm, 0.0);
    assert!(out.machining_time_min.is_infinite());
}

#[test]
fn zero_final_diameter_is_domain_error() {
    let res = compute_turning_job(TurningJobInput {
        final_diameter_mm: 0.0,
        ..sample()
    });
    assert_eq!(res, Err(DomainError::ZeroFinalDiameter));
}

#[test]
fn reject_policy_refuses_degenerate_cut() {
    let input = TurningJobInput {
        feed_rate_mm_per_rev: 0.0,
        ..sample()
    };
    assert_eq!(
        compute_turning_job_with(input, DegenerateCutPolicy::Reject),
        Err(DomainError::DegenerateCut)
    );
    assert_eq!(
        evaluate_turning_job(input, DegenerateCutPolicy::Reject),
        Err(MachiningError::Domain(DomainError::DegenerateCut))
    );
}

#[test]
fn reject_policy_matches_default_on_normal_input() {
    let a = compute_turning_job(sample()).expect("default");
    let b = compute_turning_job_with(sample(), DegenerateCutPolicy::Reject).expect("reject");
    assert_eq!(a, b);
}

#[test]
fn final_diameter_must_be_smaller_than_raw() {
    let err = validate_turning_job(&TurningJobInput {
        final_diameter_mm: 38.0,
        ..sample()
    })
    .expect_err("equal diameters");
    assert_eq!(err.field, "final_diameter_mm");
    assert_eq!(err.constraint, Constraint::LessThan("raw_diameter_mm"));
}

#[test]
fn validation_reports_offending_field() {
    let err = validate_turning_job(&TurningJobInput {
        density_g_per_cm3: -1.0,
        ..sample()
    })
    .expect_err("negative density");
    assert_eq!(err.field, "density_g_per_cm3");
    assert_eq!(err.constraint, Constraint::Positive);

    let err = validate_turning_job(&TurningJobInput {
        raw_length_mm: f64::NAN,
        ..sample()
    })
    .expect_err("nan length");
    assert_eq!(err.field, "raw_length_mm");

    let err = validate_turning_job(&TurningJobInput {
        extra_time_min: -1.0,
        ..sample()
    })
    .expect_err("negative extra time");
    assert_eq!(err.constraint, Constraint::NonNegative);
}

#[test]
fn zero_machine_rate_is_rejected() {
    let input = TurningJobInput {
        feed_rate_mm_per_rev: 0.0,
        machine_hour_rate: 0.0,
        ..sample()
    };
    let err = validate_turning_job(&input).expect_err("zero rate");
    assert_eq!(err.field, "machine_hour_rate");
    assert_eq!(err.constraint, Constraint::Positive);
    assert!(matches!(
        evaluate_turning_job(input, DegenerateCutPolicy::Infinity),
        Err(MachiningError::Validation(e)) if e.field == "machine_hour_rate"
    ));
}

#[test]
fn unbounded_time_never_yields_nan_cost() {
    for rate in [0.0, 800.0] {
        let out = compute_turning_job(TurningJobInput {
            feed_rate_mm_per_rev: 0.0,
            machine_hour_rate: rate,
            ..sample()
        })
        .expect("infinite path");
        assert!(!out.machining_cost.is_nan(), "rate {rate}");
        assert!(!out.total_cost.is_nan(), "rate {rate}");
        assert_eq!(out.total_cost, f64::INFINITY);
    }
}

#[test]
fn validation_lets_zero_feed_through() {
    let input = TurningJobInput {
        feed_rate_mm_per_rev: 0.0,
        ..sample()
    };
    assert!(validate_turning_job(&input).is_ok());
    let out = evaluate_turning_job(input, DegenerateCutPolicy::Infinity).expect("evaluate");
    assert!(out.is_unbounded());
}

#[test]
fn process_defaults() {
    let extras: Vec<f64> = TurningProcess::ALL
        .iter()
        .map(|p| p.default_extra_time_min())
        .collect();
    assert_eq!(extras, vec![5.0, 10.0, 8.0, 12.0]);
    assert_eq!(TurningProcess::Chamfer.default_depth_mm(), None);
    assert_eq!(
        TurningProcess::ChamferGrooveDrill.default_depth_mm(),
        Some(25.0)
    );
}

#[test]
fn process_and_policy_parse_from_text() {
    assert_eq!(
        "chamfer-drill-slot".parse::<TurningProcess>(),
        Ok(TurningProcess::ChamferDrillSlot)
    );
    assert_eq!(
        "Chamfer Groove Slot".parse::<TurningProcess>(),
        Ok(TurningProcess::ChamferGrooveSlot)
    );
    assert!("milling".parse::<TurningProcess>().is_err());
    assert_eq!(
        "Reject".parse::<DegenerateCutPolicy>(),
        Ok(DegenerateCutPolicy::Reject)
    );
    assert_eq!(
        "inf".parse::<DegenerateCutPolicy>(),
        Ok(DegenerateCutPolicy::Infinity)
    );
}
