//! Per-resource operations. Each builds one [`RequestSpec`] and dispatches it.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use swift_verify::{Md5Hasher, VerificationError, copy_hashed};
use tracing::debug;

use crate::client::Client;
use crate::core::prefixed_headers;
use crate::data::{Method, RequestSpec, ResourceLevel, ResponseEnvelope, UploadSource};
use crate::effects::HttpClient;
use crate::error::{Error, Result};

const OBJECT_META_PREFIX: &str = "X-Object-Meta-";
const CONTAINER_META_PREFIX: &str = "X-Container-Meta-";
const REMOVE_CONTAINER_META_PREFIX: &str = "X-Remove-Container-Meta-";

impl<C: HttpClient> Client<C> {
    fn account_path(&self) -> String { self.session().account.clone() }

    fn container_path(&self, container: &str) -> String {
        format!("{}/{}", self.session().account, container)
    }

    fn object_path(&self, container: &str, object: &str) -> String {
        format!("{}/{}/{}", self.session().account, container, object)
    }

    // account

    pub async fn list_containers<I, K, V>(&self, query: I) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.request(RequestSpec::new(ResourceLevel::Account, self.account_path()).queries(query))
            .await
    }

    pub async fn account_metadata(&self) -> Result<ResponseEnvelope> {
        self.request(RequestSpec::new(ResourceLevel::Account, self.account_path()).method(Method::Head))
            .await
    }

    // container

    pub async fn create_container(&self, container: &str) -> Result<ResponseEnvelope> {
        self.request(
            RequestSpec::new(ResourceLevel::Container, self.container_path(container)).method(Method::Put),
        )
        .await
    }

    /// Fails with a 409 domain error while the container still holds objects.
    pub async fn delete_container(&self, container: &str) -> Result<ResponseEnvelope> {
        self.request(
            RequestSpec::new(ResourceLevel::Container, self.container_path(container))
                .method(Method::Delete),
        )
        .await
    }

    pub async fn container_metadata(&self, container: &str) -> Result<ResponseEnvelope> {
        self.request(
            RequestSpec::new(ResourceLevel::Container, self.container_path(container)).method(Method::Head),
        )
        .await
    }

    pub async fn list_objects<I, K, V>(&self, container: &str, query: I) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.request(RequestSpec::new(ResourceLevel::Container, self.container_path(container)).queries(query))
            .await
    }

    /// Replace the container's read ACL, e.g. `[".r:*", ".rlistings"]`.
    pub async fn set_container_read<I, S>(&self, container: &str, acl: I) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let acl = acl
            .into_iter()
            .map(|entry| entry.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.request(
            RequestSpec::new(ResourceLevel::Container, self.container_path(container))
                .method(Method::Post)
                .header("X-Container-Read", acl),
        )
        .await
    }

    pub async fn update_container_metadata<I, K, V>(&self, container: &str, meta: I) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.request(
            RequestSpec::new(ResourceLevel::Container, self.container_path(container))
                .method(Method::Post)
                .headers(prefixed_headers(CONTAINER_META_PREFIX, meta)),
        )
        .await
    }

    pub async fn delete_container_metadata<I, K>(&self, container: &str, keys: I) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let removals = keys.into_iter().map(|key| (key, "x"));
        self.request(
            RequestSpec::new(ResourceLevel::Container, self.container_path(container))
                .method(Method::Post)
                .headers(prefixed_headers(REMOVE_CONTAINER_META_PREFIX, removals)),
        )
        .await
    }

    // object

    /// Upload `source` as `container/remote`.
    ///
    /// A file source is read whole before sending. With checksums enabled the
    /// payload's MD5 goes out as `ETag`, and the service answers 422 when its
    /// own hash differs.
    pub async fn upload_object<I, K, V>(
        &self,
        container: &str,
        source: impl Into<UploadSource>,
        remote: &str,
        meta: I,
    ) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let checksum = self.checksum();
        let (payload, digest) = match source.into() {
            UploadSource::Bytes(bytes) => {
                let digest = checksum.then(|| Md5Hasher::digest(&bytes));
                (bytes, digest)
            }
            UploadSource::File(path) if checksum => {
                let (payload, digest) = read_hashed(path).await?;
                (payload, Some(digest))
            }
            UploadSource::File(path) => (Bytes::from(tokio::fs::read(&path).await?), None),
        };

        let mut spec = RequestSpec::new(ResourceLevel::Object, self.object_path(container, remote))
            .method(Method::Put)
            .headers(prefixed_headers(OBJECT_META_PREFIX, meta));
        if let Some(digest) = digest {
            spec = spec.header("ETag", hex::encode(digest));
        }
        debug!(container, remote, bytes = payload.len(), "uploading object");
        self.request(spec.body(payload)).await
    }

    /// Stream `container/object` into `local_file`.
    pub async fn retrieve_object<I, K, V>(
        &self,
        container: &str,
        object: &str,
        local_file: impl Into<PathBuf>,
        headers: I,
    ) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.request(
            RequestSpec::new(ResourceLevel::Object, self.object_path(container, object))
                .headers(headers)
                .local_file(local_file),
        )
        .await
    }

    pub async fn delete_object(&self, container: &str, object: &str) -> Result<ResponseEnvelope> {
        self.request(
            RequestSpec::new(ResourceLevel::Object, self.object_path(container, object)).method(Method::Delete),
        )
        .await
    }

    pub async fn object_metadata(&self, container: &str, object: &str) -> Result<ResponseEnvelope> {
        self.request(
            RequestSpec::new(ResourceLevel::Object, self.object_path(container, object)).method(Method::Head),
        )
        .await
    }

    pub async fn update_object_metadata<I, K, V>(
        &self,
        container: &str,
        object: &str,
        meta: I,
    ) -> Result<ResponseEnvelope>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.request(
            RequestSpec::new(ResourceLevel::Object, self.object_path(container, object))
                .method(Method::Post)
                .headers(prefixed_headers(OBJECT_META_PREFIX, meta)),
        )
        .await
    }

    /// Server-side copy into `dst_container/dst_object`.
    pub async fn copy_object(
        &self,
        src_container: &str,
        src_object: &str,
        dst_container: &str,
        dst_object: &str,
    ) -> Result<ResponseEnvelope> {
        self.request(
            RequestSpec::new(ResourceLevel::Object, self.object_path(dst_container, dst_object))
                .method(Method::Put)
                .header("X-Copy-From", format!("{src_container}/{src_object}")),
        )
        .await
    }

    /// Copy, then delete the source.
    ///
    /// The delete is only issued when the copy did not fail; a copy error is
    /// returned unchanged. Like any unclassified status, a non-2xx copy
    /// envelope counts as success here and the source is deleted.
    pub async fn move_object(
        &self,
        src_container: &str,
        src_object: &str,
        dst_container: &str,
        dst_object: &str,
    ) -> Result<ResponseEnvelope> {
        let copied = self
            .copy_object(src_container, src_object, dst_container, dst_object)
            .await?;
        debug!(status = copied.status, "copied, deleting source object");
        self.delete_object(src_container, src_object).await
    }
}

async fn read_hashed(path: PathBuf) -> Result<(Bytes, Vec<u8>)> {
    tokio::task::spawn_blocking(move || read_hashed_blocking(&path))
        .await
        .map_err(io::Error::other)?
}

fn read_hashed_blocking(path: &Path) -> Result<(Bytes, Vec<u8>)> {
    let file = File::open(path)?;
    let mut payload = Vec::new();
    let digest = copy_hashed(file, Md5Hasher::new(), &mut payload).map_err(|e| match e {
        VerificationError::Io(e) => Error::Io(e),
        other => Error::Io(io::Error::other(other)),
    })?;
    Ok((Bytes::from(payload), digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CacheConfig, Credentials};
    use crate::effects::testing::{StubHttp, StubResponse};
    use tempfile::tempdir;

    const HELLO_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";

    fn auth_ok() -> StubResponse {
        StubResponse::new(200)
            .header("X-Storage-Url", "http://store.local/v1/AUTH_t")
            .header("X-Auth-Token", "AUTH_tk")
    }

    async fn connect(http: StubHttp, checksum: bool) -> Client<StubHttp> {
        let credentials = Credentials::new("tester", "secret", "http://auth.local")
            .checksum(checksum)
            .cache(CacheConfig::Disabled);
        Client::with_http_client(http, credentials).await.unwrap()
    }

    fn has_etag(headers: &[(String, String)]) -> bool {
        headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("etag"))
    }

    #[tokio::test]
    async fn test_upload_without_checksum_sends_no_etag() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("hello.txt");
        std::fs::write(&source, "hello world").unwrap();

        let http = StubHttp::new()
            .respond(auth_ok())
            .respond(StubResponse::new(201))
            .respond(StubResponse::new(201));
        let client = connect(http, false).await;

        client
            .upload_object("c", b"hello world".to_vec(), "a.txt", [("k", "v")])
            .await
            .unwrap();
        client
            .upload_object("c", source, "b.txt", [("k", "v")])
            .await
            .unwrap();

        let sent = client.dispatcher().http().requests();
        assert_eq!(sent.len(), 3);
        for upload in &sent[1..] {
            assert!(!has_etag(&upload.headers));
            assert_eq!(upload.body.as_deref(), Some(&b"hello world"[..]));
        }
        assert_eq!(sent[2].url, "http://store.local/v1/AUTH_t/c/b.txt");
    }

    #[tokio::test]
    async fn test_upload_with_checksum_sends_md5_etag() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("hello.txt");
        std::fs::write(&source, "hello world").unwrap();

        let http = StubHttp::new()
            .respond(auth_ok())
            .respond(StubResponse::new(201))
            .respond(StubResponse::new(201));
        let client = connect(http, true).await;

        client
            .upload_object("c", b"hello world".to_vec(), "a.txt", [("Owner", "me")])
            .await
            .unwrap();
        client
            .upload_object("c", source.as_path(), "b.txt", [("Owner", "me")])
            .await
            .unwrap();

        for upload in &client.dispatcher().http().requests()[1..] {
            assert!(upload.headers.contains(&("ETag".into(), HELLO_MD5.into())));
            assert!(upload.headers.contains(&("X-Object-Meta-owner".into(), "me".into())));
        }
    }

    #[tokio::test]
    async fn test_move_deletes_after_unclassified_copy_status() {
        let http = StubHttp::new()
            .respond(auth_ok())
            .respond(StubResponse::new(500))
            .respond(StubResponse::new(204));
        let client = connect(http, false).await;

        let envelope = client.move_object("src", "a", "dst", "b").await.unwrap();

        assert_eq!(envelope.status, 204);
        let sent = client.dispatcher().http().requests();
        assert_eq!(sent[1].method, Method::Put);
        assert!(sent[1].headers.contains(&("X-Copy-From".into(), "src/a".into())));
        assert_eq!(sent[2].method, Method::Delete);
        assert_eq!(sent[2].url, "http://store.local/v1/AUTH_t/src/a");
    }

    #[tokio::test]
    async fn test_move_stops_when_copy_fails() {
        let http = StubHttp::new()
            .respond(auth_ok())
            .respond(StubResponse::new(404));
        let client = connect(http, false).await;

        let err = client.move_object("src", "a", "dst", "b").await.unwrap_err();

        assert_eq!(err.as_domain().unwrap().status, 404);
        assert_eq!(client.dispatcher().http().requests().len(), 2);
    }
}
