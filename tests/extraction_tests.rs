//! Extraction over saved archive pages, through the public parsing façade

use ko_drink_lib::application::ParsingService;
use ko_drink_lib::domain::{dedup_by_identity, paginate, RecipeMaterial};
use ko_drink_lib::infrastructure::parsing::{ParsingConfig, RecipeParseContext};

const RECIPES_HTML: &str = include_str!("fixtures/recipes.html");
const RECIPE_DETAIL_HTML: &str = include_str!("fixtures/recipe_detail.html");
const BOOKS_HTML: &str = include_str!("fixtures/books.html");
const REFERENCES_HTML: &str = include_str!("fixtures/references.html");

fn service() -> ParsingService {
    ParsingService::new(ParsingConfig::default()).expect("parsing service")
}

fn material(name: &str, value: &str) -> RecipeMaterial {
    RecipeMaterial {
        material_name: name.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn duplicate_blocks_collapse_to_unique_recipes() {
    let recipes = service().parse_all_recipes(RECIPES_HTML);
    assert_eq!(recipes.len(), 3);

    let unique = dedup_by_identity(recipes);

    assert_eq!(unique.len(), 2);
    assert!(unique.iter().all(|recipe| !recipe.recipe.is_empty()));
    assert_eq!(unique[0].liquor, "감향주(甘香酒)");
    assert_eq!(unique[0].dup, 1);
    assert_eq!(unique[1].liquor, "삼해주(三亥酒)");
}

#[test]
fn first_block_is_fully_extracted() {
    let recipes = service().parse_all_recipes(RECIPES_HTML);
    let first = &recipes[0];

    assert_eq!(first.book, "산가요록");
    assert_eq!(first.recipe.len(), 3);

    let base = &first.recipe[0];
    assert_eq!(base.step.as_deref(), Some("밑술"));
    assert_eq!(base.day, 1);
    assert_eq!(
        base.materials(),
        &[material("멥쌀", "1말"), material("물", "2말"), material("누룩", "5되")]
    );
    assert_eq!(base.memo.as_deref(), Some("고두밥"));

    assert_eq!(first.recipe[1].day, 4);
    assert_eq!(first.recipe[1].memo, None);

    let boiling = &first.recipe[2];
    assert!(boiling.is_collapsed());
    assert_eq!(boiling.day, 3);
    assert_eq!(boiling.memo.as_deref(), Some("끓이기"));

    let meta = &first.meta;
    assert_eq!(meta.liquor_hanja.as_deref(), Some("甘香酒"));
    assert_eq!(meta.tags, Some(vec!["발효주".to_string(), "순곡주".to_string()]));
    assert_eq!(meta.similar_book.as_deref(), Some("잡초"));
    assert_eq!(meta.description, None);
    assert_eq!(meta.original_text.as_deref(), Some("甘香酒 白米一斗 百洗作末"));
    assert_eq!(
        meta.original_text_translation.as_deref(),
        Some("감향주는 멥쌀 한 말을 백 번 씻어 가루 낸다")
    );

    let detail = meta.detail_recipe.as_ref().expect("detail link");
    assert_eq!(detail.params.book, "산가요록");
    assert_eq!(detail.params.liquor, "감향주");
    assert_eq!(detail.params.dup, Some(1));
}

#[test]
fn block_without_toggle_resolves_texts_through_parent() {
    let recipes = service().parse_all_recipes(RECIPES_HTML);
    let second = &recipes[1];

    // no toggle button: index 1, found in the shared <body> parent
    assert_eq!(second.dup, 2);
    assert_eq!(second.meta.original_text.as_deref(), Some("甘香酒 白米一斗 百洗作末"));
    assert_eq!(
        second.meta.original_text_translation.as_deref(),
        Some("감향주는 멥쌀 한 말을 백 번 씻어 가루 낸다")
    );
}

#[test]
fn original_text_in_following_sibling() {
    let recipes = service().parse_all_recipes(RECIPES_HTML);
    let third = &recipes[2];

    assert_eq!(third.meta.original_text.as_deref(), Some("三亥酒 正月上亥日 白米一斗"));
    assert_eq!(third.meta.original_text_translation, None);
}

#[test]
fn search_results_serialize_in_camel_case() {
    let results = service().parse_search_results(RECIPES_HTML);
    let page = paginate(results, 1, 2);

    let json = serde_json::to_value(&page).unwrap();

    assert_eq!(json["meta"]["total"], 3);
    assert_eq!(json["meta"]["totalPages"], 2);
    assert_eq!(json["meta"]["hasNext"], true);
    assert_eq!(json["data"][0]["liquorHanja"], "甘香酒");
    assert_eq!(json["data"][0]["similarBook"], "잡초");
    assert!(json["data"][0].get("dup").is_none());
    assert!(json["data"][1].get("tags").is_none());
}

#[test]
fn single_recipe_page_uses_first_block() {
    let context = RecipeParseContext::new(Some("산가요록".to_string()), Some("감향주".to_string())).with_dup(Some(2));

    let recipe = service().parse_recipe(RECIPE_DETAIL_HTML, &context);

    assert_eq!(recipe.book, "산가요록");
    assert_eq!(recipe.liquor, "감향주(甘香酒)");
    assert_eq!(recipe.dup, 2);
    assert_eq!(recipe.recipe.len(), 2);
    assert_eq!(recipe.recipe[0].materials(), &[material("멥쌀", "1말"), material("누룩", "1되")]);
    assert_eq!(recipe.recipe[0].memo.as_deref(), Some("식혀 섞는다"));
    assert!(recipe.recipe[1].is_collapsed());
    assert_eq!(recipe.meta.tags.as_ref().map(Vec::len), Some(3));
    assert_eq!(recipe.meta.original_text.as_deref(), Some("甘香酒 白米一斗 百洗 作末"));
}

#[test]
fn book_list_rows() {
    let books = service().parse_books(BOOKS_HTML);

    assert_eq!(books.len(), 2);

    let goryeo = &books[0];
    assert_eq!(goryeo.name, "고려도경");
    assert_eq!(goryeo.name_hanja.as_deref(), Some("高麗圖經"));
    assert_eq!(goryeo.author.as_deref(), Some("서긍"));
    assert_eq!(goryeo.author_hanja.as_deref(), Some("徐兢"));
    assert_eq!(goryeo.year, Some(1123));
    assert_eq!(goryeo.description.as_deref(), Some("고려 풍속 기록"));
    assert_eq!(goryeo.recipe_link.as_deref(), Some("recipe.php?book=고려도경"));

    let sanga = &books[1];
    assert_eq!(sanga.name_hanja.as_deref(), Some("山家要錄"));
    assert_eq!(sanga.author.as_deref(), Some("전순의"));
    assert_eq!(sanga.year, Some(1459));
    assert_eq!(sanga.description.as_deref(), Some("현존 최고의 조리서"));
    assert_eq!(sanga.original_link.as_deref(), Some("org.php?book=산가요록"));
    assert_eq!(sanga.reference_link.as_deref(), Some("ref.php?book=산가요록"));
}

#[test]
fn reference_rows_skip_header() {
    let references = service().parse_references(REFERENCES_HTML);

    assert_eq!(references.len(), 2);
    assert_eq!(references[0].title.as_deref(), Some("한국의 전통주 연구"));
    assert_eq!(references[0].link.as_deref(), Some("http://www.example.org/book/1"));
    assert_eq!(references[1].content.as_deref(), Some("우리 술 빚기 | 박록담 | 2005"));
}
