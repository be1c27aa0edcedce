//! File decoding via symphonia.
//!
//! Supports every container/codec enabled on the symphonia dependency
//! (wav, mp3, m4a/aac, ogg/vorbis, flac, webm). Output is interleaved
//! f32 at the source sample rate; downmix and resampling happen later.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use crate::AudioError;

/// Raw decode output, before downmix and resampling.
#[derive(Debug)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: usize,
    /// Interleaved samples, `channels` per frame.
    pub samples: Vec<f32>,
}

/// Decodes the default audio track of `path` to interleaved f32.
pub fn decode(path: &Path) -> Result<DecodedAudio, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| AudioError::Probe {
            path: path.to_path_buf(),
            source,
        })?;
    let mut format = probed.format;

    let (track_id, codec_params) = {
        let track = format.default_track().ok_or_else(|| AudioError::NoTrack {
            path: path.to_path_buf(),
        })?;
        (track.id, track.codec_params.clone())
    };

    let mut decoder = get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(0);
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut samples = Vec::<f32>::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(Error::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(source) => {
                return Err(AudioError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Skip undecodable packets, same as a lossy stream glitch.
            Err(Error::DecodeError(_)) => continue,
            Err(source) => {
                return Err(AudioError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count();

        if sample_buf
            .as_ref()
            .map(|b| b.capacity() < decoded.capacity())
            .unwrap_or(true)
        {
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let buf = sample_buf.as_mut().unwrap();

        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(AudioError::EmptyStream {
            path: path.to_path_buf(),
        });
    }

    Ok(DecodedAudio {
        sample_rate,
        channels,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{temp_path, write_wav};

    #[test]
    fn decodes_mono_wav() {
        let path = temp_path("mono.wav");
        let samples: Vec<i16> = (0..1600).map(|i| (i % 100) as i16 * 100).collect();
        write_wav(&path, 16000, 1, &samples);

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 1600);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn decodes_stereo_wav() {
        let path = temp_path("stereo.wav");
        let samples: Vec<i16> = vec![1000, 2000].repeat(800);
        write_wav(&path, 44100, 2, &samples);

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.samples.len(), 1600);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_non_audio_file() {
        let path = temp_path("not-audio.txt");
        std::fs::write(&path, b"this is not audio").unwrap();

        assert!(decode(&path).is_err());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_missing_file() {
        let err = decode(Path::new("/nonexistent/clip.wav")).unwrap_err();
        assert!(matches!(err, AudioError::Open { .. }));
    }
}
