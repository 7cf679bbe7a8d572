use anyhow::{Context, Result};

const HEADER: [&str; 8] = [
    "학기",
    "유형",
    "과목명",
    "학점",
    "지정여부",
    "담당과목",
    "교과(군)",
    "그룹 내 선택수",
];

/// (track, name, credits, status, owner, subject area, pick-limit text)
type Row = (&'static str, &'static str, u32, &'static str, &'static str, &'static str, &'static str);

fn semester_rows(grade: u32) -> Vec<Row> {
    match grade {
        1 => vec![
            ("공통", "공통국어", 4, "지정", "국어과", "국어", ""),
            ("공통", "공통수학", 4, "지정", "수학과", "수학", ""),
            ("공통", "통합과학", 3, "지정", "과학과", "과학", ""),
            ("일반선택", "물리학", 2, "선택", "과학과", "과학", "과학탐구 택2"),
            ("일반선택", "화학", 2, "선택", "과학과", "과학", "과학탐구 택2"),
            ("일반선택", "생명과학", 2, "선택", "과학과", "과학", "과학탐구 택2"),
            ("일반선택", "지구과학", 2, "선택", "과학과", "과학", "과학탐구 택2"),
            ("일반선택", "음악", 1, "선택", "예술과", "예술", ""),
            ("일반선택", "미술", 1, "선택", "예술과", "예술", ""),
        ],
        _ => vec![
            ("공통", "문학", 4, "지정", "국어과", "국어", ""),
            ("일반선택", "확률과 통계", 3, "선택", "수학과", "수학", "수학 택1"),
            ("일반선택", "미적분", 3, "선택", "수학과", "수학", "수학 택1"),
            ("진로선택", "한국지리", 2, "선택", "사회과", "사회", "사회탐구 택2"),
            ("진로선택", "세계사", 2, "선택", "사회과", "사회", "사회탐구 택2"),
            ("진로선택", "윤리와 사상", 2, "선택", "사회과", "사회", "사회탐구 택2"),
            ("진로선택", "물리학", 3, "선택", "과학과", "과학", ""),
        ],
    }
}

fn main() -> Result<()> {
    let output_path = "sample_catalog.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record(HEADER)?;

    let mut count = 0;
    for (grade, semester) in [(1, "1학년 1학기"), (2, "1학년 2학기")] {
        for (track, name, credits, status, owner, area, pick) in semester_rows(grade) {
            let credits = credits.to_string();
            writer.write_record([semester, track, name, credits.as_str(), status, owner, area, pick])?;
            count += 1;
        }
    }
    // A row without a course name; the loader drops it.
    writer.write_record(["1학년 1학기", "공통", "", "1", "지정", "", "기타", ""])?;

    writer.flush().context("flushing CSV")?;
    println!("Wrote {count} courses to {output_path}");
    Ok(())
}
