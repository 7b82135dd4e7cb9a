// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! Shared test helpers.
use httpmock::{Mock, MockServer};
use serde_json::{Value, json};

/// Token creation response body with the catalog pointing to `base`.
pub(crate) fn token_body(base: &str) -> Value {
    json!({"token": {
        "methods": ["password"],
        "expires_at": "2036-01-01T00:00:00.000000Z",
        "audit_ids": ["a1"],
        "user": {"id": "uid", "name": "u", "domain": {"id": "default", "name": "Default"}},
        "project": {"id": "pid", "name": "demo", "domain": {"id": "default", "name": "Default"}},
        "catalog": [
            {
                "type": "compute",
                "id": "nova",
                "name": "nova",
                "endpoints": [
                    {"id": "c1", "interface": "public", "region": "RegionOne", "region_id": "RegionOne", "url": format!("{base}/compute/v2.1")},
                    {"id": "c2", "interface": "internal", "region": "RegionOne", "region_id": "RegionOne", "url": format!("{base}/compute-internal/v2.1")},
                    {"id": "c3", "interface": "admin", "region": "RegionOne", "region_id": "RegionOne", "url": format!("{base}/compute-admin/v2.1")}
                ]
            },
            {
                "type": "image",
                "id": "glance",
                "name": "glance",
                "endpoints": [
                    {"id": "i1", "interface": "public", "region": "RegionOne", "region_id": "RegionOne", "url": format!("{base}/image")}
                ]
            },
            {
                "type": "volumev3",
                "id": "cinder",
                "name": "cinderv3",
                "endpoints": [
                    {"id": "v1", "interface": "public", "region": "RegionOne", "region_id": "RegionOne", "url": format!("{base}/volume/v3/pid")}
                ]
            }
        ]
    }})
}

/// Mock the token creation returning `token` in the subject header.
pub(crate) async fn mock_token_create<'a>(
    server: &'a MockServer,
    token: &str,
    base: &str,
) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method("POST").path("/v3/auth/tokens");
            then.status(201)
                .header("content-type", "application/json")
                .header("x-subject-token", token)
                .json_body(token_body(base));
        })
        .await
}
