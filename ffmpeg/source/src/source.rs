/*!
    Demuxing of a media file.
*/

use std::path::{Path, PathBuf};

use ffmpeg_next::{codec, format, media};
use tracing::{debug, trace};

use ffmpeg_types::{
    CodecId, Demuxer, Error, MediaDuration, Packet, Pts, Rational, Result, VideoStreamInfo,
};

use crate::convert::{
    codec_from_ffmpeg, error_from_ffmpeg, is_again, pixel_from_ffmpeg, rational_from_ffmpeg,
};

/**
    Codec parameters of an input stream, needed to open its decoder.
*/
pub struct CodecConfig {
    parameters: codec::Parameters,
}

impl CodecConfig {
    /**
        Consume the config, returning the FFmpeg codec parameters.
    */
    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }

    /**
        Codec of the stream, if it is one we know.
    */
    pub fn codec(&self) -> Option<CodecId> {
        codec_from_ffmpeg(self.parameters.id())
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec", &self.parameters.id())
            .finish()
    }
}

/**
    An opened media file.

    Packets of every stream are returned in file order; callers pick out
    the ones belonging to [`Demuxer::video_stream`].
*/
pub struct Source {
    path: PathBuf,
    input: format::context::Input,
    time_bases: Vec<Rational>,
    video: Option<VideoStreamInfo>,
    codec_config: Option<CodecConfig>,
}

impl Source {
    /**
        Open the media file at `path` and probe its best video stream.

        Opening succeeds for inputs without video; the pipeline reports
        that case itself.
    */
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        crate::init()?;

        let path = path.as_ref().to_path_buf();
        let input = format::input(&path)
            .map_err(|e| Error::codec(format!("could not open {}: {e}", path.display())))?;

        let time_bases = input
            .streams()
            .map(|stream| rational_from_ffmpeg(stream.time_base()))
            .collect();

        let (video, codec_config) = match input.streams().best(media::Type::Video) {
            Some(stream) => {
                let parameters = stream.parameters();
                let info = probe_video(&stream, parameters.clone())?;
                (Some(info), Some(CodecConfig { parameters }))
            }
            None => (None, None),
        };

        match &video {
            Some(info) => debug!(
                path = %path.display(),
                streams = input.streams().count(),
                video_stream = info.index,
                "opened input"
            ),
            None => debug!(path = %path.display(), "opened input without video"),
        }

        Ok(Self {
            path,
            input,
            time_bases,
            video,
            codec_config,
        })
    }

    /**
        Path the source was opened from.
    */
    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Take the codec configuration of the video stream.

        Returns None if there is no video or it was already taken.
    */
    pub fn take_video_codec_config(&mut self) -> Option<CodecConfig> {
        self.codec_config.take()
    }
}

impl Demuxer for Source {
    fn video_stream(&self) -> Option<VideoStreamInfo> {
        self.video.clone()
    }

    fn next_packet(&mut self) -> Result<Option<Packet>> {
        let mut packet = ffmpeg_next::Packet::empty();
        loop {
            match packet.read(&mut self.input) {
                Ok(()) => break,
                Err(ffmpeg_next::Error::Eof) => {
                    trace!("end of input");
                    return Ok(None);
                }
                Err(e) if is_again(&e) => continue,
                Err(e) => return Err(error_from_ffmpeg(e)),
            }
        }

        let stream_index = packet.stream();
        let time_base = self
            .time_bases
            .get(stream_index)
            .copied()
            .ok_or_else(|| Error::invalid_data(format!("packet of unknown stream {stream_index}")))?;

        Ok(Some(Packet::new(
            packet.data().map(<[u8]>::to_vec).unwrap_or_default(),
            stream_index,
            packet.pts().map(Pts),
            packet.dts().map(Pts),
            MediaDuration(packet.duration()),
            time_base,
            packet.is_key(),
        )))
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("path", &self.path)
            .field("video", &self.video)
            .finish_non_exhaustive()
    }
}

/**
    Read the size and pixel format of a video stream from its parameters.
*/
fn probe_video(stream: &format::stream::Stream, parameters: codec::Parameters) -> Result<VideoStreamInfo> {
    let decoder = codec::context::Context::from_parameters(parameters)
        .map_err(|e| Error::codec(e.to_string()))?
        .decoder()
        .video()
        .map_err(|e| Error::unsupported_format(format!("video stream {}: {e}", stream.index())))?;

    let frame_rate = rational_from_ffmpeg(stream.avg_frame_rate());

    Ok(VideoStreamInfo {
        index: stream.index(),
        codec: codec_from_ffmpeg(decoder.id()),
        width: decoder.width(),
        height: decoder.height(),
        pixel_format: pixel_from_ffmpeg(decoder.format()),
        time_base: rational_from_ffmpeg(stream.time_base()),
        frame_rate: frame_rate.is_positive().then_some(frame_rate),
    })
}

