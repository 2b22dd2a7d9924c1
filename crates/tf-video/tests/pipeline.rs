//! Integration tests for tf-video: construction, merging and validation

use std::collections::BTreeSet;

use tf_core::{DecodeOptions, Error, Itag, CIPHER_SIGNATURE_REQUIRED_CODE};
use tf_video::{
    merge, resolve, validate, CipherReference, Payloads, StreamDescriptor, Thumbnail,
    ValidatedVideo, VideoRecord,
};

const ID: &str = "dQw4w9WgXcQ";

/// Info payload with one direct and one cipher-protected progressive stream
fn info_payload() -> String {
    [
        "title=Test+Video",
        "author=Uploader",
        "view_count=42",
        "thumbnail_url=http%3A%2F%2Fx%2Fa.jpg,120,90",
        "url_encoded_fmt_stream_map=itag%3D18%26url%3Dhttps%253A%252F%252Fr.example%252F18%253Fexpire%253D2000\
%2Citag%3D22%26s%3DZYX%26url%3Dhttps%253A%252F%252Fr.example%252F22",
    ]
    .join("&")
}

fn itags(video: &ValidatedVideo) -> BTreeSet<u32> {
    video.streams().keys().map(|i| i.value()).collect()
}

fn record_itags(record: &VideoRecord) -> BTreeSet<u32> {
    record.streams().keys().map(|i| i.value()).collect()
}

#[test]
fn test_construct_decodes_title_and_thumbnail() {
    let record = VideoRecord::construct(ID, &info_payload()).unwrap();
    assert_eq!(record.metadata().title.as_deref(), Some("Test Video"));
    assert_eq!(record.metadata().view_count, Some(42));
    assert_eq!(record.thumbnails(), &[Thumbnail::new("http://x/a.jpg", 120, 90)]);
}

#[test]
fn test_title_and_thumbnail_without_streams() {
    let info = "title=Test+Video&thumbnail_url=http%3A%2F%2Fx%2Fa.jpg,120,90";

    let record = VideoRecord::supplemental(ID, info).unwrap();
    assert_eq!(record.metadata().title.as_deref(), Some("Test Video"));
    assert_eq!(record.thumbnails(), &[Thumbnail::new("http://x/a.jpg", 120, 90)]);

    // The initial payload alone must yield a stream.
    let err = VideoRecord::construct(ID, info).unwrap_err();
    assert!(matches!(err, Error::NoPlayableStreams { .. }));
}

#[test]
fn test_empty_identifier_wins_over_payload_errors() {
    for info in [info_payload().as_str(), "", "garbage"] {
        let err = VideoRecord::construct("", info).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)), "info {info:?}");
    }
}

#[test]
fn test_signature_parameter_sets_cipher_flag() {
    let record = VideoRecord::construct(ID, &info_payload()).unwrap();
    assert!(!record.stream(Itag::new(18)).unwrap().requires_cipher_decoding);
    assert!(record.stream(Itag::new(22)).unwrap().requires_cipher_decoding);
}

#[test]
fn test_merge_example() {
    let base = VideoRecord::from_streaming_data(ID, "itag=18&url=u1").unwrap();
    let supplemental = VideoRecord::from_streaming_data(ID, "itag=18&bitrate=500\nitag=22&url=u2").unwrap();

    let merged = merge(base, supplemental);
    let s18 = merged.stream(Itag::new(18)).unwrap();
    assert_eq!((s18.url.as_deref(), s18.bitrate), (Some("u1"), Some(500)));
    let s22 = merged.stream(Itag::new(22)).unwrap();
    assert_eq!((s22.url.as_deref(), s22.bitrate), (Some("u2"), None));
    assert_eq!(merged.streams().len(), 2);
}

#[test]
fn test_merge_coverage_commutes() {
    let a = VideoRecord::from_streaming_data(ID, "itag=18&url=a18,itag=22&url=a22").unwrap();
    let b = VideoRecord::from_streaming_data(ID, "itag=22&url=b22,itag=43&url=b43").unwrap();

    let ab = merge(a.clone(), b.clone());
    let ba = merge(b, a);
    assert_eq!(record_itags(&ab), record_itags(&ba));
    assert_eq!(record_itags(&ab), BTreeSet::from([18, 22, 43]));

    assert_eq!(ab.stream(Itag::new(22)).unwrap().url.as_deref(), Some("b22"));
    assert_eq!(ba.stream(Itag::new(22)).unwrap().url.as_deref(), Some("a22"));
}

#[test]
fn test_merge_with_itself_keeps_coverage() {
    let a = VideoRecord::construct(ID, &info_payload()).unwrap();
    let merged = merge(a.clone(), a.clone());
    assert_eq!(record_itags(&merged), record_itags(&a));
    // Thumbnails are evidence, not keyed records.
    assert_eq!(merged.thumbnails().len(), 2 * a.thumbnails().len());
}

#[test]
fn test_cipher_flag_survives_merge_either_way() {
    let protected = VideoRecord::from_streaming_data(ID, "itag=22&s=SIG&url=u22").unwrap();
    let direct = VideoRecord::from_streaming_data(ID, "itag=22&url=u22").unwrap();

    for merged in [merge(protected.clone(), direct.clone()), merge(direct, protected)] {
        assert!(merged.stream(Itag::new(22)).unwrap().requires_cipher_decoding);
    }
}

#[test]
fn test_validate_partitions_and_expiration() {
    let video = validate(VideoRecord::construct(ID, &info_payload()).unwrap()).unwrap();

    let usable: Vec<Itag> = video.usable_streams().map(|s| s.itag).collect();
    let pending: Vec<Itag> = video.cipher_pending_streams().map(|s| s.itag).collect();
    assert_eq!(usable, vec![Itag::new(18)]);
    assert_eq!(pending, vec![Itag::new(22)]);
    assert_eq!(video.expiration().map(|t| t.timestamp()), Some(2000));

    let err = video.url(Itag::new(22)).unwrap().unwrap_err();
    assert_eq!(err.code(), CIPHER_SIGNATURE_REQUIRED_CODE);
    assert_eq!(video.url(Itag::new(18)).unwrap().unwrap(), "https://r.example/18?expire=2000");
}

#[test]
fn test_validate_empty_merge_fails() {
    let empty = VideoRecord::supplemental(ID, "title=x").unwrap();
    let err = validate(merge(empty.clone(), empty)).unwrap_err();
    assert!(matches!(err, Error::NoPlayableStreams { .. }));
    assert!(err.is_retryable());
}

#[test]
fn test_playable_url_with_closure_decoder() {
    let video = validate(VideoRecord::construct(ID, &info_payload()).unwrap()).unwrap();
    let decoder = |r: &CipherReference| -> Result<String, String> { Ok(r.signature.to_lowercase()) };

    let url = video.playable_url(Itag::new(22), &decoder).unwrap().unwrap();
    assert_eq!(url, "https://r.example/22?signature=zyx");
}

#[test]
fn test_resolve_full_pipeline() {
    let manifest = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=246440,RESOLUTION=320x180\nhttps://m.example/itag/91/expire/1500/index.m3u8\n";
    let payloads = Payloads::new(info_payload())
        .with_manifest(manifest)
        .with_streaming_data("itag=140&url=https%3A%2F%2Fr.example%2F140&type=audio%2Fmp4")
        .with_dash_stream_url(Itag::new(137), "https://d.example/137");

    let video = resolve(ID, &payloads).unwrap();
    assert_eq!(itags(&video), BTreeSet::from([18, 22, 91, 137, 140]));
    assert_eq!(video.expiration().map(|t| t.timestamp()), Some(1500));
    assert!(video.stream(Itag::new(140)).unwrap().is_audio_only());
    assert_eq!(video.metadata().author.as_deref(), Some("Uploader"));
}

#[test]
fn test_dash_urls_complete_url_less_descriptors() {
    let info = "adaptive_fmts=itag%3D137%26bitrate%3D4000000%26size%3D1920x1080";
    let payloads = Payloads::new(info).with_dash_stream_url(Itag::new(137), "https://d.example/137");
    let video = resolve(ID, &payloads).unwrap();

    let stream: &StreamDescriptor = video.stream(Itag::new(137)).unwrap();
    assert_eq!(stream.url.as_deref(), Some("https://d.example/137"));
    assert_eq!(stream.resolution, Some((1920, 1080)));
}

#[test]
fn test_custom_options_through_pipeline() {
    let options = DecodeOptions {
        stream_map_keys: vec!["fmts".into()],
        ..DecodeOptions::default()
    };
    let info = "fmts=itag%3D18%26url%3Du18";
    let video = tf_video::resolve_with(ID, &Payloads::new(info), &options).unwrap();
    assert_eq!(itags(&video), BTreeSet::from([18]));
    assert!(resolve(ID, &Payloads::new(info)).is_err());
}

#[test]
fn test_validated_video_serializes() {
    let video = validate(VideoRecord::construct(ID, &info_payload()).unwrap()).unwrap();
    let json = serde_json::to_value(&video).unwrap();
    assert_eq!(json["id"], ID);
    assert_eq!(json["metadata"]["title"], "Test Video");
    assert!(json["streams"]["22"]["requires_cipher_decoding"].as_bool().unwrap());
}

#[test]
fn test_independent_records_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|n| {
            std::thread::spawn(move || {
                let payload = format!("itag={}&url=u{n}", 18 + n);
                let record = VideoRecord::from_streaming_data(ID, &payload).unwrap();
                validate(record).map(|v| v.streams().len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 1);
    }
}
