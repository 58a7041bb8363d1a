//! 추출 엔진 벤치마크: 레시피 블록 수에 따른 문서 파싱 시간

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ko_drink_lib::application::ParsingService;
use ko_drink_lib::domain::dedup_by_identity;
use ko_drink_lib::infrastructure::parsing::ParsingConfig;

/// Synthetic search page with `blocks` recipe tables, every third one a duplicate
fn search_page(blocks: usize) -> String {
    let mut html = String::from("<html><body>");
    for index in 0..blocks {
        let liquor = format!("술{}", index - index % 3);
        html.push_str(&format!(
            r#"<table class="table_rcp">
                 <tr class="tr_rcp_title"><td>{n}. <a href="book.php?book=산가요록">산가요록</a>
                   <a href="recipe.php?book=산가요록&amp;liq={liquor}&amp;dup={n}" target="상세 주방문">{liquor}(甘香酒)</a>
                   [발효주,순곡주] 단맛 ☞ 유사:《잡초》
                   <button class="toggle_org_button" onclick="ToggleText(this,{n})">원문</button></td></tr>
                 <tr class="tr_rcp_grid"><td>밑술</td><td>1</td><td></td><td>1말</td><td>2말</td></tr>
                 <tr class="tr_rcp_grid"><td>덧술</td><td>3</td><td></td><td>2말</td><td></td></tr>
                 <tr id="id_text_org_{n}"><td>甘香酒 白米一斗 百洗作末</td></tr>
               </table>"#,
            n = index + 1,
            liquor = liquor,
        ));
    }
    html.push_str("</body></html>");
    html
}

fn bench_search_extraction(c: &mut Criterion) {
    let service = ParsingService::new(ParsingConfig::default()).expect("parsing service");
    let mut group = c.benchmark_group("search_extraction");

    for blocks in [10, 50, 200] {
        let html = search_page(blocks);
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &html, |b, html| {
            b.iter(|| dedup_by_identity(service.parse_all_recipes(black_box(html))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search_extraction);
criterion_main!(benches);
