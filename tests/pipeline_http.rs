use std::time::Duration;
use torgi_lots::pipeline::{self, Aggregator, HttpPageSource, PageSource};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const FLAT: &str = "Квартира двухкомнатная, 54 кв.м, Васильевский остров, д. 12";
const GARAGE: &str = "Гаражный бокс площадью 18 кв.м в ГСК «Северный», бокс 41";
const LAND: &str = "Земельный участок сельскохозяйственного назначения площадью 12 га";

fn listing_page(rows: &[(&str, &str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(id, name, region, price)| {
            format!(
                r#"<tr><td>{id}</td><td><a href="?class=Auction&action=View&id={id}">{name}</a></td><td>{region}</td><td>{price}</td><td>20-03-2024</td><td>Прием заявок</td></tr>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><meta charset="windows-1251"></head><body>
        <table><tr><td><a href="/">Torgi.org</a></td></tr></table>
        <table><tr><th>№</th><th>Наименование</th><th>Регион</th><th>Цена</th><th>Дата</th><th>Статус</th></tr>{body}</table>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, page: &str, html: String) {
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(&html);
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("class", "Auction"))
        .and(query_param("page", page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes.into_owned())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(server)
        .await;
}

fn source_for(server: &MockServer) -> HttpPageSource {
    let listing = Url::parse(&format!(
        "{}/index.php?class=Auction&action=List&mod=Open",
        server.uri()
    ))
    .unwrap();
    HttpPageSource::new(listing, "page")
}

#[tokio::test]
async fn test_http_source_fetches_numbered_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "2", listing_page(&[("7", FLAT, "г. Санкт-Петербург", "95 000 руб.")])).await;

    let html = source_for(&server).fetch_page(2).await.unwrap();

    assert!(html.contains(FLAT));
    assert!(source_for(&server).fetch_page(1).await.is_err());
}

#[tokio::test]
async fn test_pipeline_over_http() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        listing_page(&[
            ("1", FLAT, "г. Санкт-Петербург", "4 750 000,00 руб."),
            ("2", GARAGE, "Мурманская обл", "310 000 руб."),
        ]),
    )
    .await;
    mount_page(
        &server,
        "2",
        listing_page(&[
            ("1", FLAT, "г. Санкт-Петербург", "4 750 000,00 руб."),
            ("3", LAND, "Краснодарский край", "1 200 000 руб."),
        ]),
    )
    .await;
    // page 3 is not mounted and answers 404

    let aggregator = Aggregator::new(source_for(&server))
        .with_page_delay(Duration::from_millis(5))
        .with_retries(1, Duration::ZERO);

    let lots = pipeline::sort_by_price_desc(aggregator.run(3).await);

    let names: Vec<&str> = lots.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec![FLAT, LAND, GARAGE]);
    assert_eq!(lots[0].price, 4750000.0);
    assert_eq!(lots[0].region, "г. Санкт-Петербург");
    assert_eq!(
        lots[0].link,
        "https://torgi.org/index.php?class=Auction&action=View&id=1"
    );
    assert_eq!(lots[2].region, "Мурманская обл");

    let affordable = pipeline::filter_by_price_range(lots, Some(300_000.0), Some(1_200_000.0));
    let names: Vec<&str> = affordable.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec![LAND, GARAGE]);
}
