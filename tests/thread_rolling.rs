//! 나사 전조 계산 회귀 테스트.
use machining_cost_toolbox::machining::{
    compute_thread_job, evaluate_thread_job, DomainError, MachiningError, RollingMaterial,
    ThreadJobInput,
};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn sample() -> ThreadJobInput {
    ThreadJobInput {
        major_diameter_mm: 10.0,
        pitch_mm: 1.5,
        length_mm: 20.0,
        rolling_speed_m_per_min: 20.0,
        density_g_per_cm3: 7.85,
        cost_per_kg: 1.0,
        material_volume_cm3: 100.0,
        machine_hourly_rate: 20.0,
        operator_hourly_rate: 15.0,
        tool_cost: 100.0,
        tool_life_parts: 1000,
    }
}

#[test]
fn reference_job() {
    let out = compute_thread_job(sample()).expect("thread");
    assert_close("rpm", out.spindle_speed_rpm, 636.619_772_367_581_4, 1e-9);
    assert_close("feed", out.feed_rate_mm_per_min, 954.929_658_551_372_1, 1e-9);
    assert_close("time", out.rolling_time_min, 0.020_943_951_023_931_952, 1e-9);
    assert_close("material", out.material_cost, 0.785, 1e-12);
    assert_close("machine", out.machine_cost, 0.006_981_317_007_977_317_5, 1e-9);
    assert_close("labor", out.labor_cost, 0.005_235_987_755_982_988, 1e-9);
    assert_close("tooling", out.tooling_cost_per_part, 0.1, 1e-12);
    assert_close("total", out.total_cost, 0.897_217_304_763_960_3, 1e-9);
}

#[test]
fn total_is_sum_of_parts() {
    let out = compute_thread_job(sample()).expect("thread");
    assert_eq!(
        out.total_cost,
        out.material_cost + out.machine_cost + out.labor_cost + out.tooling_cost_per_part
    );
}

#[test]
fn zero_major_diameter_is_domain_error() {
    let res = compute_thread_job(ThreadJobInput {
        major_diameter_mm: 0.0,
        ..sample()
    });
    assert_eq!(res, Err(DomainError::ZeroMajorDiameter));
}

#[test]
fn zero_rolling_speed_is_domain_error() {
    let res = compute_thread_job(ThreadJobInput {
        rolling_speed_m_per_min: 0.0,
        ..sample()
    });
    assert_eq!(res, Err(DomainError::ZeroRollingFeed));
}

#[test]
fn zero_pitch_is_domain_error() {
    let res = compute_thread_job(ThreadJobInput {
        pitch_mm: 0.0,
        ..sample()
    });
    assert_eq!(res, Err(DomainError::ZeroRollingFeed));
}

#[test]
fn zero_tool_life_is_domain_error() {
    let input = ThreadJobInput {
        tool_life_parts: 0,
        ..sample()
    };
    assert_eq!(compute_thread_job(input), Err(DomainError::ZeroToolLife));
    assert!(matches!(
        evaluate_thread_job(input),
        Err(MachiningError::Validation(e)) if e.field == "tool_life_parts"
    ));
}

#[test]
fn material_speed_check() {
    let mild = RollingMaterial::MildSteel;
    assert_eq!(mild.speed_range(), (10.0, 30.0));
    assert!(mild.check_speed(20.0).is_none());
    assert!(mild.check_speed(10.0).is_none());
    assert!(mild.check_speed(35.0).is_some());
    assert!(RollingMaterial::TitaniumAlloys.check_speed(20.0).is_some());
}

#[test]
fn material_parses_from_label_or_slug() {
    assert_eq!(
        "stainless-steel".parse::<RollingMaterial>(),
        Ok(RollingMaterial::StainlessSteel)
    );
    assert_eq!(
        "Brass & Copper".parse::<RollingMaterial>(),
        Ok(RollingMaterial::BrassCopper)
    );
    assert!("wood".parse::<RollingMaterial>().is_err());
    assert_eq!(RollingMaterial::default(), RollingMaterial::MildSteel);
}

#[test]
fn menu_index_out_of_range_is_none() {
    assert_eq!(
        RollingMaterial::from_menu_index(1),
        Some(RollingMaterial::AluminiumAlloys)
    );
    assert_eq!(
        RollingMaterial::from_menu_index(8),
        Some(RollingMaterial::TitaniumAlloys)
    );
    assert_eq!(RollingMaterial::from_menu_index(0), None);
    assert_eq!(RollingMaterial::from_menu_index(9), None);
    assert_eq!(RollingMaterial::from_menu_index(u32::MAX), None);
}

#[test]
fn taylor_reference_values() {
    let mild = RollingMaterial::MildSteel;
    assert_eq!(mild.taylor_exponent(), 0.2);
    assert_eq!(mild.taylor_constant_range(), (40.0, 80.0));
    assert_eq!(RollingMaterial::TitaniumAlloys.taylor_exponent(), 0.1);
    assert_eq!(
        RollingMaterial::AluminiumAlloys.taylor_constant_range(),
        (80.0, 120.0)
    );
    for m in RollingMaterial::ALL {
        let (lo, hi) = m.taylor_constant_range();
        assert!(lo < hi, "{m}");
        assert!(m.taylor_exponent() > 0.0 && m.taylor_exponent() < 1.0, "{m}");
    }
}
