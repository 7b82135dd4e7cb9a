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
//

use httpmock::{Mock, MockServer};
use serde_json::json;

/// Mock the identity service accepting the `u`/`p` credentials.
pub async fn mock_identity(server: &MockServer) -> Mock<'_> {
    let base = server.base_url();
    server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/v3/auth/tokens")
                .json_body_partial(
                    r#"{"auth": {"identity": {"methods": ["password"], "password": {"user": {"name": "u", "password": "p"}}}}}"#,
                );
            then.status(201)
                .header("content-type", "application/json")
                .header("x-subject-token", "integration-token")
                .json_body(json!({"token": {
                    "methods": ["password"],
                    "expires_at": "2036-01-01T00:00:00.000000Z",
                    "user": {"id": "uid", "name": "u"},
                    "catalog": [
                        {
                            "type": "compute",
                            "name": "nova",
                            "endpoints": [
                                {"interface": "public", "region": "RegionOne", "url": format!("{base}/compute/v2.1")},
                                {"interface": "admin", "region": "RegionOne", "url": format!("{base}/compute-admin/v2.1")}
                            ]
                        },
                        {
                            "type": "image",
                            "name": "glance",
                            "endpoints": [
                                {"interface": "public", "region": "RegionOne", "url": format!("{base}/image")},
                                {"interface": "public", "region": "RegionTwo", "url": format!("{base}/image-two")}
                            ]
                        }
                    ]
                }}));
        })
        .await
}
