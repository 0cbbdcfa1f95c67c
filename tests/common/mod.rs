//! Mock developer portal shared by the integration tests
//!
//! The mock serves the login form, then the team form, then the real pages,
//! the way the portal does for a fresh session of a multi-team account.

#![allow(dead_code)]

use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use devcenter_fetcher::app::SiteUrls;
use devcenter_fetcher::config::PortalConfigToml;

pub const LOGIN: &str = "jane@example.com";
pub const PASSWORD: &str = "secret";
pub const TEAM_ID: &str = "BBBBB22222";
pub const DEV_UUID: &str = "11111111-2222-3333-4444-555555555555";
pub const DIST_UUID: &str = "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee";

pub const LOGIN_PAGE: &str = r##"<html><body>
    <form name="appleConnectForm" method="post" action="/login">
        <input type="hidden" name="wosid" value="xyz">
        <input type="text" name="theAccountName">
        <input type="password" name="theAccountPW">
    </form></body></html>"##;

pub const TEAM_PAGE: &str = r##"<html><body>
    <form name="saveTeamSelection" method="post" action="/team">
        <select name="memberDisplayId">
            <option value="AAAAA11111" selected>First Team</option>
            <option value="BBBBB22222">Second Team</option>
        </select>
        <input type="submit" name="action:saveTeamSelection!save" value="Continue">
    </form></body></html>"##;

pub const DEVICES_PAGE: &str = r##"<html><body>
    <fieldset id="fs-0"><table><tbody>
        <tr><td class="name"><span>Jane's iPhone</span></td><td class="id">0123456789abcdef</td></tr>
        <tr><td class="name"><span>QA iPad</span></td><td class="id">fedcba9876543210</td></tr>
    </tbody></table></fieldset></body></html>"##;

pub const DEV_PROFILES_PAGE: &str = r##"<html><body><table><tbody>
    <tr>
        <td class="profile"><a href="#">Team Development</a></td>
        <td class="appid">ABCDE12345.*</td>
        <td class="statusXcode">Active
            Renew</td>
        <td class="action"><a href="/ios/manage/provisioningprofiles/download.action?blobId=DEVBLOB">Download</a></td>
    </tr>
    <tr><td colspan="5">Profiles pending approval are not shown</td></tr>
</tbody></table></body></html>"##;

pub const DIST_PROFILES_PAGE: &str = r##"<html><body><table><tbody>
    <tr>
        <td class="profile"><a href="#">App Store</a></td>
        <td class="appid">ABCDE12345.com.example.app</td>
        <td class="statusXcode">Active</td>
        <td class="action"><a href="download.action?blobId=DISTBLOB">Download</a></td>
    </tr>
</tbody></table></body></html>"##;

pub const DEV_CERTS_PAGE: &str = r##"<html><body><div class="nt_multi"><table><tbody>
    <tr>
        <td class="name"><div><p>iPhone Developer: Jane Doe</p></div></td>
        <td class="profiles">Team Development</td>
        <td class="date">Mar 03, 2013</td>
        <td class="status">Issued</td>
        <td class="last"><form></form><a href="/ios/manage/certificates/team/downloadCert.action?certDisplayId=DEVCERT">Download</a></td>
    </tr>
</tbody></table></div></body></html>"##;

pub const DIST_CERTS_PAGE: &str = r##"<html><body><div class="nt_multi"><table><tbody>
    <tr><td colspan="4"><span>Your distribution certificate request is pending</span></td></tr>
    <tr>
        <td class="name"><a href="#">iPhone Distribution: Example Inc</a></td>
        <td class="profile">App Store</td>
        <td class="expdate">Jan 01, 2014</td>
        <td class="status">Issued</td>
        <td class="action last"><form></form><a href="/ios/manage/certificates/team/downloadCert.action?certDisplayId=DISTCERT">Download</a></td>
    </tr>
</tbody></table></div></body></html>"##;

pub fn site_urls(server: &MockServer) -> SiteUrls {
    let base = Url::parse(&server.uri()).unwrap();
    PortalConfigToml::default().to_site_urls().unwrap().rebase(&base)
}

pub async fn page(server: &MockServer, url_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .with_priority(5)
        .mount(server)
        .await;
}

async fn artifact(server: &MockServer, url_path: &str, key: &str, value: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .and(query_param(key, value))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a complete portal whose first page view asks for login and team
pub async fn mock_portal() -> MockServer {
    let server = MockServer::start().await;
    let devices = "/ios/manage/devices/index.action";

    Mock::given(method("GET"))
        .and(path(devices))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(devices))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEAM_PAGE))
        .up_to_n_times(1)
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("theAccountName=jane%40example.com"))
        .and(body_string_contains("theAccountPW=secret"))
        .and(body_string_contains("wosid=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/team"))
        .and(body_string_contains(format!("memberDisplayId={}", TEAM_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    page(&server, devices, DEVICES_PAGE).await;
    page(&server, "/ios/my/provision/index.action", DEV_PROFILES_PAGE).await;
    page(
        &server,
        "/ios/manage/provisioningprofiles/viewDistributionProfiles.action",
        DIST_PROFILES_PAGE,
    )
    .await;
    page(&server, "/ios/manage/certificates/team/index.action", DEV_CERTS_PAGE).await;
    page(&server, "/ios/manage/certificates/team/distribute.action", DIST_CERTS_PAGE).await;

    Mock::given(method("GET"))
        .and(path("/appleca/AppleIncRootCertificate.cer"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x30, 0x82, 0x04]))
        .expect(1)
        .mount(&server)
        .await;

    let profiles = "/ios/manage/provisioningprofiles/download.action";
    artifact(&server, profiles, "blobId", "DEVBLOB", DEV_UUID).await;
    artifact(&server, profiles, "blobId", "DISTBLOB", DIST_UUID).await;

    let certs = "/ios/manage/certificates/team/downloadCert.action";
    artifact(&server, certs, "certDisplayId", "DEVCERT", "dev-cert").await;
    artifact(&server, certs, "certDisplayId", "DISTCERT", "dist-cert").await;

    server
}
