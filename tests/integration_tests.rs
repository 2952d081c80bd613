//! Integration tests for clima-bot against a mocked CPTEC

use std::sync::Arc;

use clima_bot::config::CptecConfig;
use clima_bot::{
    CityResolver, CityStore, ClimaError, CptecClient, CptecTodayScraper, ForecastFetcher,
    LookupTableBuilder, ReplyService, cptec, normalize_name,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PERDOES_SEARCH: &str = r#"<?xml version='1.0' encoding='ISO-8859-1'?>
<cidades><cidade><nome>Bom Jesus dos Perdões</nome><uf>SP</uf><id>4963</id></cidade></cidades>"#;

const ATIBAIA_SEARCH: &str = r#"<?xml version='1.0' encoding='ISO-8859-1'?>
<cidades><cidade><nome>Atibaia</nome><uf>SP</uf><id>5130</id></cidade></cidades>"#;

const BONITO_SEARCH: &str = r#"<?xml version='1.0' encoding='ISO-8859-1'?>
<cidades>
<cidade><nome>Bonito</nome><uf>MS</uf><id>891</id></cidade>
<cidade><nome>Bonito</nome><uf>PA</uf><id>892</id></cidade>
<cidade><nome>Bonito</nome><uf>PE</uf><id>893</id></cidade>
</cidades>"#;

const PERDOES_FORECAST: &str = r#"<?xml version='1.0' encoding='ISO-8859-1'?>
<cidade><nome>Bom Jesus dos Perdões</nome><uf>SP</uf><atualizacao>2024-05-01</atualizacao>
<previsao><dia>2024-05-02</dia><tempo>cl</tempo><maxima>29</maxima><minima>15</minima><iuv>10.0</iuv></previsao>
<previsao><dia>2024-05-03</dia><tempo>pn</tempo><maxima>27</maxima><minima>16</minima><iuv>9.0</iuv></previsao>
<previsao><dia>2024-05-04</dia><tempo>c</tempo><maxima>22</maxima><minima>14</minima><iuv>5.0</iuv></previsao>
<previsao><dia>2024-05-05</dia><tempo>t</tempo><maxima>21</maxima><minima>13</minima><iuv>4.0</iuv></previsao>
</cidade>"#;

const PERDOES_PAGE: &str = r#"<html><body><div class="col-md-12">
<div class="d-flex"><div class="p-2"><img class="img-responsive center-block" src="/icones/ps_n.png"></div>
<div class="p-2 text-center">Sol com algumas nuvens.</div></div>
<div class="row align-middle justify-content-md-center"><div class="col-md-4 temperaturas"><span class="text-danger">30°</span><span class="text-primary">16°</span></div></div>
<div class="row align-middle justify-content-md-center"><div class="col-md-4"><span>Umidade</span><span>35%</span></div></div>
<div class="row align-middle justify-content-md-center"><div class="col-md-4"><span>UV</span><span>11</span></div></div>
</div></body></html>"#;

/// CPTEC serves Latin-1 with the charset only in the XML declaration
fn latin1_xml(body: &str) -> ResponseTemplate {
    let bytes = encoding_rs::WINDOWS_1252.encode(body).0.into_owned();
    ResponseTemplate::new(200).set_body_raw(bytes, "text/xml")
}

fn cptec_config(server: &MockServer) -> CptecConfig {
    CptecConfig {
        service_base_url: server.uri(),
        site_base_url: server.uri(),
        ..CptecConfig::default()
    }
}

fn cptec_client(server: &MockServer) -> CptecClient {
    let config = cptec_config(server);
    CptecClient::new(cptec::http_client(&config).unwrap(), &config)
}

fn reply_service(server: &MockServer, store: Arc<CityStore>) -> ReplyService<CptecTodayScraper> {
    let config = cptec_config(server);
    let http = cptec::http_client(&config).unwrap();
    let fetcher = ForecastFetcher::new(
        CptecClient::new(http.clone(), &config),
        CptecTodayScraper::new(http, &config),
    );
    ReplyService::new(CityResolver::new(store), fetcher)
}

async fn mount_search(server: &MockServer, query: &str, body: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/XML/listaCidades"))
        .and(query_param("city", query))
        .respond_with(latin1_xml(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Accented names survive the Latin-1 XML service
#[tokio::test]
async fn test_latin1_documents_are_decoded() {
    let server = MockServer::start().await;
    mount_search(&server, "bom jesus dos perdoes", PERDOES_SEARCH, 2).await;
    Mock::given(method("GET"))
        .and(path("/XML/cidade/4963/previsao.xml"))
        .respond_with(latin1_xml(PERDOES_FORECAST))
        .mount(&server)
        .await;

    let client = cptec_client(&server);
    let cities = client.search_cities("bom jesus dos perdoes").await.unwrap();
    assert_eq!(cities[0].name, "Bom Jesus dos Perdões");

    let forecast = client.forecast(4963).await.unwrap();
    assert_eq!(forecast.name, "Bom Jesus dos Perdões");

    let store = Arc::new(CityStore::in_memory().unwrap());
    store.add_reference_name(1, "Bom Jesus dos Perdões").unwrap();
    LookupTableBuilder::new(client, store.clone())
        .run()
        .await
        .unwrap();

    let city = CityResolver::new(store).resolve("bom jesus dos perdoes").unwrap();
    assert_eq!(city.name, "Bom Jesus dos Perdões");
}

/// Builder issues one search per reference name and stores every candidate
#[tokio::test]
async fn test_build_queries_each_name_once() {
    let server = MockServer::start().await;
    mount_search(&server, "bom jesus dos perdoes", PERDOES_SEARCH, 1).await;
    mount_search(&server, "atibaia", ATIBAIA_SEARCH, 1).await;
    mount_search(&server, "bonito", BONITO_SEARCH, 1).await;

    let store = Arc::new(CityStore::in_memory().unwrap());
    store.add_reference_name(1, "Bom Jesus dos Perdões").unwrap();
    store.add_reference_name(2, "Atibaia").unwrap();
    store.add_reference_name(3, "Bonito").unwrap();

    let builder = LookupTableBuilder::new(cptec_client(&server), store.clone());
    let report = builder.run().await.unwrap();

    assert_eq!(report.names_processed, 3);
    assert_eq!(report.cities_inserted, 5);
    assert_eq!(store.city_count().unwrap(), 5);
    assert_eq!(
        store.find_city("bom jesus dos perdoes").unwrap().unwrap().id,
        4963
    );
    assert_eq!(store.find_city("bonito").unwrap().unwrap().state, "MS");
}

/// A failing search aborts the batch and keeps the rows written before it
#[tokio::test]
async fn test_build_fails_fast() {
    let server = MockServer::start().await;
    mount_search(&server, "atibaia", ATIBAIA_SEARCH, 1).await;
    Mock::given(method("GET"))
        .and(path("/XML/listaCidades"))
        .and(query_param("city", "bonito"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_search(&server, "bom jesus dos perdoes", PERDOES_SEARCH, 0).await;

    let store = Arc::new(CityStore::in_memory().unwrap());
    store.add_reference_name(1, "Atibaia").unwrap();
    store.add_reference_name(2, "Bonito").unwrap();
    store.add_reference_name(3, "Bom Jesus dos Perdões").unwrap();

    let builder = LookupTableBuilder::new(cptec_client(&server), store.clone());
    let result = builder.run().await;

    assert!(matches!(result, Err(ClimaError::FetchError(_))));
    assert_eq!(store.city_count().unwrap(), 1);
    assert!(store.find_city("bom jesus dos perdoes").unwrap().is_none());
}

/// Running the build twice duplicates rows
#[tokio::test]
async fn test_rebuild_inserts_duplicates() {
    let server = MockServer::start().await;
    mount_search(&server, "atibaia", ATIBAIA_SEARCH, 2).await;

    let store = Arc::new(CityStore::in_memory().unwrap());
    store.add_reference_name(1, "Atibaia").unwrap();

    let builder = LookupTableBuilder::new(cptec_client(&server), store.clone());
    builder.run().await.unwrap();
    builder.run().await.unwrap();

    assert_eq!(store.city_count().unwrap(), 2);
}

/// Full path: build the table on disk, then answer a chat payload
#[tokio::test]
async fn test_end_to_end_forecast_reply() {
    let server = MockServer::start().await;
    mount_search(&server, "bom jesus dos perdoes", PERDOES_SEARCH, 1).await;
    Mock::given(method("GET"))
        .and(path("/XML/cidade/4963/previsao.xml"))
        .respond_with(latin1_xml(PERDOES_FORECAST))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/previsao-tempo/sp/bom-jesus-dos-perdoes"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PERDOES_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cities.db");
    {
        let store = Arc::new(CityStore::open(&db_path).unwrap());
        store.add_reference_name(1, "Bom Jesus dos Perdões").unwrap();
        LookupTableBuilder::new(cptec_client(&server), store)
            .run()
            .await
            .unwrap();
    }

    let payload = "bom jesus dos perdoes";
    assert_eq!(normalize_name(payload), payload);

    let store = Arc::new(CityStore::open(&db_path).unwrap());
    let city = CityResolver::new(store.clone()).resolve(payload).unwrap();
    assert_eq!(city.id, 4963);
    assert_eq!(city.state, "SP");

    let service = reply_service(&server, store);
    let reply = service.reply(payload).await;

    assert!(reply.markdown);
    assert!(reply.text.starts_with("Bom Jesus dos Perdões, SP\n"));
    assert!(reply.text.contains("*Hoje*: ☀ Sol com algumas nuvens.\nMín. 16ºC, Máx. 30ºC, UV 11\n"));
    assert!(reply.text.contains("*Amanhã*: ☀ Céu Claro\nMín. 15ºC, Máx. 29ºC, UV 10.0\n"));
    assert!(reply.text.contains("*Depois de amanhã*: 🌤 Parcialmente Nublado\n"));
    assert!(!reply.text.contains("Chuva"));
}

/// Fetcher returns exactly 4 entries with today first
#[tokio::test]
async fn test_fetch_returns_four_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/XML/cidade/4963/previsao.xml"))
        .respond_with(latin1_xml(PERDOES_FORECAST))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/previsao-tempo/sp/bom-jesus-dos-perdoes"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PERDOES_PAGE))
        .mount(&server)
        .await;

    let config = cptec_config(&server);
    let http = cptec::http_client(&config).unwrap();
    let fetcher = ForecastFetcher::new(
        CptecClient::new(http.clone(), &config),
        CptecTodayScraper::new(http, &config),
    );

    let city = clima_bot::City::new(4963, "Bom Jesus dos Perdões", "SP");
    let result = fetcher.fetch(&city).await.unwrap();

    assert_eq!(result.forecasts.len(), 4);
    assert_eq!(result.forecasts[0].climate, "ps");
    assert_eq!(result.forecasts[0].day.len(), "2024-05-01".len());
    assert_eq!(result.forecasts[1].day, "2024-05-02");
    assert_eq!(result.forecasts[3].day, "2024-05-04");
}

/// Unknown city text gets the localized not-found reply
#[tokio::test]
async fn test_reply_for_unknown_city() {
    let server = MockServer::start().await;
    let store = Arc::new(CityStore::in_memory().unwrap());

    let reply = reply_service(&server, store).reply("atlantida").await;

    assert!(!reply.markdown);
    assert_eq!(reply.text, "Não encontrei este município.");
}

/// Upstream failure gets the localized fetch-error reply
#[tokio::test]
async fn test_reply_when_forecast_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/XML/cidade/5130/previsao.xml"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let store = Arc::new(CityStore::in_memory().unwrap());
    store
        .insert_city(&clima_bot::City::new(5130, "Atibaia", "SP"))
        .unwrap();

    let reply = reply_service(&server, store).reply("atibaia").await;

    assert!(!reply.markdown);
    assert!(reply.text.starts_with("Erro ao obter previsão: "));
}

/// A page without the expected layout is reported, not rendered
#[tokio::test]
async fn test_reply_when_page_layout_changed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/XML/cidade/4963/previsao.xml"))
        .respond_with(latin1_xml(PERDOES_FORECAST))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/previsao-tempo/sp/bom-jesus-dos-perdoes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>manutenção</body></html>"))
        .mount(&server)
        .await;

    let store = Arc::new(CityStore::in_memory().unwrap());
    store
        .insert_city(&clima_bot::City::new(4963, "Bom Jesus dos Perdões", "SP"))
        .unwrap();

    let reply = reply_service(&server, store)
        .reply("bom jesus dos perdoes")
        .await;

    assert!(!reply.markdown);
    assert!(reply.text.contains("Scrape error"));
}
