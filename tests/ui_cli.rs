//! 대화형 메뉴 입력 처리와 배치 결과 표시 테스트.
use machining_cost_toolbox::i18n::Translator;
use machining_cost_toolbox::machining::{
    compute_batch, BatchParams, BatchRecord, DegenerateCutPolicy,
};
use machining_cost_toolbox::ui_cli::{
    batch_result_lines, main_menu_from, read_line_from, MenuChoice,
};

fn params() -> BatchParams {
    BatchParams {
        density_g_per_cm3: 7.85,
        cost_per_kg: 55.0,
        feed_rate_mm_per_rev: 0.20,
        cutting_speed_m_per_min: 20.0,
        machine_hour_rate: 800.0,
        policy: DegenerateCutPolicy::Infinity,
        parallel: false,
    }
}

fn record(length: &str) -> BatchRecord {
    [("length", length), ("dia", "36"), ("chamfer", "5")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn closed_input_exits_menu() {
    let tr = Translator::new("en");
    let choice = main_menu_from(&tr, &mut "".as_bytes()).expect("menu");
    assert_eq!(choice, MenuChoice::Exit);
}

#[test]
fn invalid_selection_then_closed_input_exits_menu() {
    let tr = Translator::new("en");
    let choice = main_menu_from(&tr, &mut "9\nabc\n".as_bytes()).expect("menu");
    assert_eq!(choice, MenuChoice::Exit);
}

#[test]
fn menu_reads_selection() {
    let tr = Translator::new("en");
    let choice = main_menu_from(&tr, &mut " 3 \n".as_bytes()).expect("menu");
    assert_eq!(choice, MenuChoice::Batch);
}

#[test]
fn read_line_reports_end_of_input() {
    let err = read_line_from(&mut "".as_bytes(), "> ").expect_err("eof");
    assert!(err.is_end_of_input());

    let line = read_line_from(&mut "\n".as_bytes(), "> ").expect("blank line");
    assert_eq!(line, "\n");
}

#[test]
fn batch_lines_follow_input_order() {
    let tr = Translator::new("en");
    let records = vec![record("250"), record("abc"), record("300"), record("")];
    let result = compute_batch(&params(), 38.0, &records);
    let lines = batch_result_lines(&tr, "Rs", &result);

    assert_eq!(lines.len(), records.len() + 2);
    let rows = &lines[1..lines.len() - 1];
    for (i, line) in rows.iter().enumerate() {
        assert_eq!(line.split_whitespace().next(), Some(i.to_string().as_str()));
    }
    assert!(rows[0].contains("250.0"));
    assert!(rows[1].contains("Failed row"));
    assert!(rows[2].contains("300.0"));
    assert!(rows[3].contains("Failed row"));
    assert!(lines[lines.len() - 1].contains("2/2/0"));
}
