use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use crate::detection::domain::landmark_detector::{Detection, DetectionError, LandmarkDetector};
use crate::shared::frame::Frame;
use crate::shared::image_codec::{self, EncodedFormat};

/// Client for the face service's `/detect-face` endpoint.
///
/// Uploads the frame as a PNG in the multipart field `file` and expects
/// `{"face_detected": bool, "landmarks": [{"x": f, "y": f}, ...]}` back.
pub struct HttpLandmarkDetector {
    client: Client,
    url: String,
}

impl HttpLandmarkDetector {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DetectionError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DetectionError::Transport {
                url: url.clone(),
                source: e,
            })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, source: reqwest::Error) -> DetectionError {
        DetectionError::Transport {
            url: self.url.clone(),
            source,
        }
    }
}

impl LandmarkDetector for HttpLandmarkDetector {
    fn detect(&self, frame: &Frame) -> Result<Detection, DetectionError> {
        let png = image_codec::encode(frame, EncodedFormat::Png)
            .map_err(DetectionError::Encode)?;

        let part = Part::bytes(png.bytes().to_vec())
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| self.transport_error(e))?;
        let form = Form::new().part("file", part);

        log::debug!("POST {} ({} bytes)", self.url, png.bytes().len());
        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetectionError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| self.transport_error(e))?;
        parse_detection(&body)
    }
}

/// Parses a face service response body.
pub fn parse_detection(body: &str) -> Result<Detection, DetectionError> {
    serde_json::from_str(body).map_err(DetectionError::MalformedResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hit() {
        let d = parse_detection(
            r#"{"face_detected": true, "landmarks": [{"x": 0.1, "y": 0.2}, {"x": 0.3, "y": 0.4}]}"#,
        )
        .unwrap();
        assert!(d.has_face());
        assert_eq!(d.landmarks.len(), 2);
    }

    #[test]
    fn test_parse_miss() {
        let d = parse_detection(r#"{"face_detected": false, "landmarks": []}"#).unwrap();
        assert!(!d.has_face());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_detection("<html>502</html>"),
            Err(DetectionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let detector =
            HttpLandmarkDetector::new("http://127.0.0.1:1/detect-face", Duration::from_secs(2))
                .unwrap();
        let frame = Frame::filled(8, 8, [10, 20, 30]);
        match detector.detect(&frame) {
            Err(DetectionError::Transport { url, .. }) => {
                assert_eq!(url, "http://127.0.0.1:1/detect-face")
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
